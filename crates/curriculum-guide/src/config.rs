//! Page configuration
//!
//! Every timing and threshold constant the page uses lives here so tests can
//! shrink durations or move thresholds without touching the wiring.

use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};

/// Tunable constants for the curriculum guide page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Visible fraction at which fade/scale elements are revealed
    pub reveal_threshold: f64,
    /// Visible fraction at which credit counters start animating
    pub counter_threshold: f64,
    /// Counter animation duration in milliseconds
    pub counter_duration_ms: f64,
    /// Scroll offset past which the back-to-top button is shown
    pub back_to_top_threshold_px: f64,
    /// Header background offset per scrolled pixel
    pub parallax_rate: f64,
    /// Transition delay added per staggered card, in seconds
    pub stagger_step_secs: f64,
    /// How long a pressed tag stays scaled down
    pub tag_press_ms: f64,
    /// Lifetime of a ripple span
    pub ripple_ms: f64,
    /// Prefix applied to every preference key
    pub preference_prefix: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            counter_threshold: 0.5,
            counter_duration_ms: 1500.0,
            back_to_top_threshold_px: 300.0,
            parallax_rate: 0.3,
            stagger_step_secs: 0.1,
            tag_press_ms: 100.0,
            ripple_ms: 600.0,
            preference_prefix: "curriculum_".to_string(),
        }
    }
}

impl PageConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> PageResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> PageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the reveal threshold
    #[must_use]
    pub fn with_reveal_threshold(mut self, threshold: f64) -> Self {
        self.reveal_threshold = threshold;
        self
    }

    /// Set the counter threshold
    #[must_use]
    pub fn with_counter_threshold(mut self, threshold: f64) -> Self {
        self.counter_threshold = threshold;
        self
    }

    /// Set the counter duration
    #[must_use]
    pub fn with_counter_duration_ms(mut self, duration_ms: f64) -> Self {
        self.counter_duration_ms = duration_ms;
        self
    }

    /// Set the back-to-top scroll threshold
    #[must_use]
    pub fn with_back_to_top_threshold(mut self, px: f64) -> Self {
        self.back_to_top_threshold_px = px;
        self
    }

    /// Set the parallax rate
    #[must_use]
    pub fn with_parallax_rate(mut self, rate: f64) -> Self {
        self.parallax_rate = rate;
        self
    }

    /// Set the preference key prefix
    #[must_use]
    pub fn with_preference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.preference_prefix = prefix.into();
        self
    }

    /// Check that every field is in range
    pub fn validate(&self) -> PageResult<()> {
        check_fraction("reveal_threshold", self.reveal_threshold)?;
        check_fraction("counter_threshold", self.counter_threshold)?;
        check_non_negative("counter_duration_ms", self.counter_duration_ms)?;
        check_non_negative("back_to_top_threshold_px", self.back_to_top_threshold_px)?;
        check_non_negative("stagger_step_secs", self.stagger_step_secs)?;
        check_non_negative("tag_press_ms", self.tag_press_ms)?;
        check_non_negative("ripple_ms", self.ripple_ms)?;
        if !self.parallax_rate.is_finite() {
            return Err(PageError::config("parallax_rate must be finite"));
        }
        if self.preference_prefix.is_empty() {
            return Err(PageError::config("preference_prefix must not be empty"));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> PageResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PageError::config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> PageResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PageError::config(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_constants() {
        let config = PageConfig::default();
        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.counter_threshold, 0.5);
        assert_eq!(config.counter_duration_ms, 1500.0);
        assert_eq!(config.back_to_top_threshold_px, 300.0);
        assert_eq!(config.parallax_rate, 0.3);
        assert_eq!(config.preference_prefix, "curriculum_");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PageConfig::new()
            .with_reveal_threshold(0.25)
            .with_counter_threshold(1.0)
            .with_counter_duration_ms(100.0)
            .with_back_to_top_threshold(50.0)
            .with_parallax_rate(0.5)
            .with_preference_prefix("guide_");
        assert_eq!(config.reveal_threshold, 0.25);
        assert_eq!(config.counter_threshold, 1.0);
        assert_eq!(config.counter_duration_ms, 100.0);
        assert_eq!(config.back_to_top_threshold_px, 50.0);
        assert_eq!(config.parallax_rate, 0.5);
        assert_eq!(config.preference_prefix, "guide_");
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = PageConfig::from_json(r#"{ "counter_duration_ms": 300 }"#).unwrap();
        assert_eq!(config.counter_duration_ms, 300.0);
        assert_eq!(config.reveal_threshold, 0.1);
    }

    #[test]
    fn test_from_json_rejects_bad_threshold() {
        let err = PageConfig::from_json(r#"{ "reveal_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, PageError::Config { .. }));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = PageConfig::from_json("[").unwrap_err();
        assert!(matches!(err, PageError::Json(_)));
    }

    #[test]
    fn test_validate_negative_duration() {
        let config = PageConfig::new().with_counter_duration_ms(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_prefix() {
        let config = PageConfig::new().with_preference_prefix("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nan_parallax() {
        let config = PageConfig::new().with_parallax_rate(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_fields() {
        let config = PageConfig::new().with_counter_duration_ms(900.0);
        let json = config.to_json().unwrap();
        assert!(json.contains("counter_duration_ms"));
        assert_eq!(PageConfig::from_json(&json).unwrap(), config);
    }
}

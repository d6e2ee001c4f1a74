//! Decorative effects: card hover, tag press, button ripple, card stagger
//!
//! Effects that undo themselves after a delay (tag press, ripple) are queued
//! on an [`EffectScheduler`] and run from the same frame clock as the
//! counters, so tests drive them with synthetic timestamps.

use tracing::trace;

use crate::core::geometry::Rect;
use crate::host::{ElementId, HostDocument};

/// Cards that lift on hover
pub const HOVER_CARD_CLASS: &str = "school-card";

/// Tags that shrink briefly when clicked
pub const TAG_CLASS: &str = "tag";

/// Buttons that show a ripple when clicked
pub const RIPPLE_CLASSES: [&str; 3] = ["tab-btn", "grade-btn", "card-btn"];

/// Elements whose transitions start one after another
pub const STAGGER_CLASSES: [&str; 5] = [
    "school-card",
    "feature-item",
    "time-card",
    "grade-card",
    "change-item",
];

/// Keyframes injected into `<head>` for the ripple animation
pub const RIPPLE_KEYFRAMES: &str = "
        @keyframes ripple {
            to {
                transform: scale(4);
                opacity: 0;
            }
        }
    ";

/// Lifts or lowers a hover card
pub fn hover_card(doc: &mut dyn HostDocument, card: ElementId, entering: bool) {
    let transform = if entering {
        "translateY(-10px)"
    } else {
        "translateY(0)"
    };
    doc.set_style(card, "transform", transform);
}

/// Applies `transition-delay: i * step` to every staggered element
pub fn apply_stagger(doc: &mut dyn HostDocument, step_secs: f64) -> usize {
    let elements = doc.query_classes(&STAGGER_CLASSES);
    for (index, &element) in elements.iter().enumerate() {
        let delay = index as f64 * step_secs;
        doc.set_style(element, "transition-delay", &format!("{delay}s"));
    }
    elements.len()
}

/// Appends the ripple keyframes `<style>` to `<head>`
pub fn inject_ripple_keyframes(doc: &mut dyn HostDocument) -> Option<ElementId> {
    let head = doc.head()?;
    let style = doc.create_child(head, "style")?;
    doc.set_text(style, RIPPLE_KEYFRAMES);
    Some(style)
}

/// Size and offset of a ripple circle inside its button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    /// Diameter
    pub size: f64,
    /// Left offset inside the button
    pub left: f64,
    /// Top offset inside the button
    pub top: f64,
}

impl RippleGeometry {
    /// Circle centred on the click point, as wide as the button's longer side
    #[must_use]
    pub fn centred_on(button: &Rect, client_x: f64, client_y: f64) -> Self {
        let size = button.width.max(button.height);
        Self {
            size,
            left: client_x - button.x - size / 2.0,
            top: client_y - button.y - size / 2.0,
        }
    }
}

/// Work queued to run after a delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredEffect {
    /// Restore an inline `transform`
    SetTransform {
        /// Target element
        element: ElementId,
        /// Transform to apply
        value: String,
    },
    /// Detach a temporary element
    Remove(ElementId),
}

impl DeferredEffect {
    fn apply(&self, doc: &mut dyn HostDocument) {
        match self {
            Self::SetTransform { element, value } => doc.set_style(*element, "transform", value),
            Self::Remove(element) => doc.remove(*element),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledEffect {
    due_at: f64,
    effect: DeferredEffect,
}

/// Time-ordered queue of deferred effects
#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    pending: Vec<ScheduledEffect>,
}

impl EffectScheduler {
    /// Creates an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `effect` to run at `due_at`
    pub fn schedule(&mut self, due_at: f64, effect: DeferredEffect) {
        let index = self.pending.partition_point(|p| p.due_at <= due_at);
        self.pending.insert(index, ScheduledEffect { due_at, effect });
    }

    /// Runs every effect due at or before `now`, in due order
    pub fn run_due(&mut self, doc: &mut dyn HostDocument, now: f64) -> usize {
        let due = self.pending.partition_point(|p| p.due_at <= now);
        for scheduled in self.pending.drain(..due) {
            trace!(due_at = scheduled.due_at, effect = ?scheduled.effect, "deferred effect");
            scheduled.effect.apply(doc);
        }
        due
    }

    /// Earliest pending due time
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|p| p.due_at)
    }

    /// Number of queued effects
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every queued effect, returning them
    pub fn drain(&mut self) -> Vec<DeferredEffect> {
        self.pending.drain(..).map(|p| p.effect).collect()
    }
}

/// Shrinks a tag and queues its restore
pub fn press_tag(
    doc: &mut dyn HostDocument,
    scheduler: &mut EffectScheduler,
    tag: ElementId,
    now: f64,
    press_ms: f64,
) {
    doc.set_style(tag, "transform", "scale(0.95)");
    scheduler.schedule(
        now + press_ms,
        DeferredEffect::SetTransform {
            element: tag,
            value: "scale(1)".to_string(),
        },
    );
}

/// Adds a ripple span to `button` and queues its removal
///
/// Returns `None` when the button has no layout box.
pub fn spawn_ripple(
    doc: &mut dyn HostDocument,
    scheduler: &mut EffectScheduler,
    button: ElementId,
    client_x: f64,
    client_y: f64,
    now: f64,
    lifetime_ms: f64,
) -> Option<ElementId> {
    let rect = doc.bounding_rect(button)?;
    let geometry = RippleGeometry::centred_on(&rect, client_x, client_y);
    let ripple = doc.create_child(button, "span")?;
    let size = format!("{}px", geometry.size);
    let styles = [
        ("position", "absolute".to_string()),
        ("border-radius", "50%".to_string()),
        ("background", "rgba(255, 255, 255, 0.4)".to_string()),
        ("width", size.clone()),
        ("height", size),
        ("left", format!("{}px", geometry.left)),
        ("top", format!("{}px", geometry.top)),
        ("transform", "scale(0)".to_string()),
        ("animation", "ripple 0.6s linear".to_string()),
        ("pointer-events", "none".to_string()),
    ];
    for (property, value) in &styles {
        doc.set_style(ripple, property, value);
    }
    doc.set_style(button, "position", "relative");
    doc.set_style(button, "overflow", "hidden");
    scheduler.schedule(now + lifetime_ms, DeferredEffect::Remove(ripple));
    Some(ripple)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::{DomElement, MockDom};

    #[test]
    fn test_hover_card() {
        let mut dom = MockDom::new();
        let card = dom.mount_in_body(DomElement::new("div").with_class(HOVER_CARD_CLASS));
        hover_card(&mut dom, card, true);
        assert_eq!(dom.style(card, "transform").as_deref(), Some("translateY(-10px)"));
        hover_card(&mut dom, card, false);
        assert_eq!(dom.style(card, "transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_stagger_document_order() {
        let mut dom = MockDom::curriculum_page();
        let count = apply_stagger(&mut dom, 0.5);
        assert_eq!(count, 7);
        let first = dom.element_by_id("school-card-1").unwrap();
        let second = dom.element_by_id("school-card-2").unwrap();
        let feature = dom.element_by_id("tab-middle-intro").unwrap();
        assert_eq!(dom.style(first, "transition-delay").as_deref(), Some("0s"));
        assert_eq!(dom.style(second, "transition-delay").as_deref(), Some("0.5s"));
        assert_eq!(dom.style(feature, "transition-delay").as_deref(), Some("1s"));
    }

    #[test]
    fn test_ripple_geometry() {
        let rect = Rect::new(100.0, 50.0, 200.0, 40.0);
        let g = RippleGeometry::centred_on(&rect, 150.0, 60.0);
        assert_eq!(g.size, 200.0);
        assert_eq!(g.left, -50.0);
        assert_eq!(g.top, -90.0);
    }

    #[test]
    fn test_spawn_ripple_and_expire() {
        let mut dom = MockDom::new();
        let button = dom.mount_in_body(
            DomElement::new("button")
                .with_class("card-btn")
                .with_layout(0.0, 0.0, 100.0, 40.0),
        );
        let mut scheduler = EffectScheduler::new();
        let ripple = spawn_ripple(&mut dom, &mut scheduler, button, 50.0, 20.0, 1000.0, 600.0)
            .unwrap();
        assert_eq!(dom.parent(ripple), Some(button));
        assert_eq!(dom.style(ripple, "width").as_deref(), Some("100px"));
        assert_eq!(dom.style(ripple, "left").as_deref(), Some("0px"));
        assert_eq!(dom.style(ripple, "top").as_deref(), Some("-30px"));
        assert_eq!(dom.style(button, "overflow").as_deref(), Some("hidden"));
        assert_eq!(scheduler.next_due(), Some(1600.0));

        assert_eq!(scheduler.run_due(&mut dom, 1599.0), 0);
        assert!(dom.contains(ripple));
        assert_eq!(scheduler.run_due(&mut dom, 1600.0), 1);
        assert!(!dom.contains(ripple));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_ripple_needs_layout() {
        let mut dom = MockDom::new();
        let button = dom.mount_in_body(DomElement::new("button"));
        let mut scheduler = EffectScheduler::new();
        assert!(spawn_ripple(&mut dom, &mut scheduler, button, 0.0, 0.0, 0.0, 600.0).is_none());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_press_tag_restores() {
        let mut dom = MockDom::new();
        let tag = dom.mount_in_body(DomElement::new("span").with_class(TAG_CLASS));
        let mut scheduler = EffectScheduler::new();
        press_tag(&mut dom, &mut scheduler, tag, 10.0, 100.0);
        assert_eq!(dom.style(tag, "transform").as_deref(), Some("scale(0.95)"));
        scheduler.run_due(&mut dom, 110.0);
        assert_eq!(dom.style(tag, "transform").as_deref(), Some("scale(1)"));
    }

    #[test]
    fn test_scheduler_orders_by_due_time() {
        let mut dom = MockDom::new();
        let a = dom.mount_in_body(DomElement::new("span"));
        let b = dom.mount_in_body(DomElement::new("span"));
        let mut scheduler = EffectScheduler::new();
        scheduler.schedule(
            200.0,
            DeferredEffect::SetTransform {
                element: a,
                value: "late".to_string(),
            },
        );
        scheduler.schedule(
            100.0,
            DeferredEffect::SetTransform {
                element: a,
                value: "early".to_string(),
            },
        );
        scheduler.schedule(150.0, DeferredEffect::Remove(b));
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.next_due(), Some(100.0));
        assert_eq!(scheduler.run_due(&mut dom, 1000.0), 3);
        assert_eq!(dom.style(a, "transform").as_deref(), Some("late"));
        assert!(!dom.contains(b));
    }

    #[test]
    fn test_inject_keyframes() {
        let mut dom = MockDom::new();
        let style = inject_ripple_keyframes(&mut dom).unwrap();
        assert_eq!(dom.parent(style), dom.head());
        assert!(dom.text(style).unwrap().contains("@keyframes ripple"));
    }

    #[test]
    fn test_drain() {
        let mut scheduler = EffectScheduler::new();
        scheduler.schedule(1.0, DeferredEffect::Remove(ElementId(3)));
        assert_eq!(scheduler.drain(), vec![DeferredEffect::Remove(ElementId(3))]);
        assert!(scheduler.is_empty());
    }
}

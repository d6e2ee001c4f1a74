//! Curriculum Guide - interactivity for the 2022 revised curriculum page
//!
//! Scroll-triggered reveals, count-up credit numbers, tab/grade/subject
//! selectors, an accordion, a back-to-top button and a handful of decorative
//! effects, written as a headless state machine over a host document.
//!
//! The same page logic runs against [`dom::MockDom`] in tests and against the
//! real browser document with the `wasm` feature.
//!
//! # Example
//!
//! ```rust
//! use curriculum_guide::prelude::*;
//!
//! let store = MemoryStore::new().with_value("curriculum_lastTab", "tab-middle");
//! let mut page = CurriculumPage::init(MockDom::curriculum_page(), store, PageConfig::default())
//!     .unwrap();
//! assert_eq!(page.restored_tab(), Some("tab-middle"));
//!
//! let high = page.doc().element_by_id("tab-btn-high").unwrap();
//! let outcome = page.handle_event(PageEvent::click(high, 0.0));
//! assert_eq!(outcome.selection.unwrap().key, "tab-high");
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod host;
pub mod page;

/// Browser bindings (`wasm` feature)
#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::PageConfig;
    pub use crate::core::counter::{extract_leading_integer, format_grouped, CounterAnimation};
    pub use crate::core::effects::{EffectScheduler, RippleGeometry};
    pub use crate::core::geometry::{Rect, Viewport};
    pub use crate::core::groups::{Activatable, GroupKind, GroupRegistry, Selection};
    pub use crate::core::preferences::{MemoryStore, PreferenceStore, Preferences};
    pub use crate::core::trigger::{TriggerEvent, TriggerKind, VisibilityTrigger};
    pub use crate::dom::{DomElement, HostCall, MockDom};
    pub use crate::error::{PageError, PageResult};
    pub use crate::host::{ElementId, HostDocument};
    pub use crate::page::{CurriculumPage, EventOutcome, PageEvent};

    #[cfg(feature = "wasm")]
    pub use crate::wasm::{BrowserDocument, LocalStorageStore};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let page = CurriculumPage::init(MockDom::new(), MemoryStore::new(), PageConfig::default())
            .unwrap();
        assert!(page.groups().is_empty());
    }

    #[test]
    fn test_counter_helpers() {
        assert_eq!(extract_leading_integer("1,234명"), Some(1234));
        assert_eq!(format_grouped(1234), "1,234");
        let mut counter = CounterAnimation::new(10, 100.0);
        counter.tick(0.0);
        assert_eq!(counter.tick(100.0).unwrap().text, "10");
    }

    #[test]
    fn test_group_kinds() {
        let registry = GroupRegistry::discover(&MockDom::curriculum_page());
        for kind in GroupKind::ALL {
            assert!(registry.group(kind).is_some(), "{kind} missing");
        }
    }

    #[test]
    fn test_error_display() {
        let err = PageError::config("bad");
        assert!(err.to_string().contains("bad"));
    }
}

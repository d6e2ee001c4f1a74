//! Platform-independent page logic
//!
//! Nothing in here talks to a browser. Every routine works against
//! [`crate::host::HostDocument`] and takes time as an argument.

pub mod counter;
pub mod effects;
pub mod geometry;
pub mod groups;
pub mod preferences;
pub mod scroll;
pub mod trigger;

pub use counter::{extract_leading_integer, format_grouped, CounterAnimation, CounterFrame, CounterPhase};
pub use effects::{DeferredEffect, EffectScheduler, RippleGeometry};
pub use geometry::{Rect, Viewport};
pub use groups::{
    AccordionMember, Activatable, Group, GroupKind, GroupRegistry, PanelMember, Selection,
    SelectionPolicy, ACTIVE_CLASS,
};
pub use preferences::{MemoryStore, PreferenceStore, Preferences, LAST_TAB_KEY};
pub use scroll::{AnchorLinks, BackToTop, Parallax};
pub use trigger::{TriggerEvent, TriggerKind, VisibilityTrigger, WatchedElement, REVEALED_CLASS};

//! Scroll-triggered reveal and counter start
//!
//! [`VisibilityTrigger`] keeps a registration table of watched elements.
//! Whenever the host reports a scroll, resize or layout change the page calls
//! [`VisibilityTrigger::check`], which measures each watched element against
//! the viewport and fires its one-shot action once the visible fraction
//! reaches the element's threshold:
//!
//! ```text
//! Unregistered ──register──► Registered ──threshold──► Revealed   (reveal)
//!                                 │
//!                                 └──threshold──► Animating ──tick…──► Done   (counter)
//! ```
//!
//! Rows are keyed by element and kind, so one element can both reveal and
//! count up. Firing always removes the row, so an element reveals at most once
//! per registration no matter how often the user scrolls past it. Re-arming
//! (after a tab switch) clears the `visible` class and registers again.

use tracing::{debug, trace};

use super::counter::CounterAnimation;
use crate::host::{ElementId, HostDocument};

/// Class applied to revealed elements
pub const REVEALED_CLASS: &str = "visible";

/// Marker attribute set on counters before they start animating
pub const ANIMATED_ATTR: &str = "data-animated";

/// Classes of elements that fade or scale in when scrolled into view
pub const REVEAL_CLASSES: [&str; 4] = ["fade-in", "fade-in-left", "fade-in-right", "scale-in"];

/// Class of elements whose number counts up when scrolled into view
pub const COUNTER_CLASS: &str = "credit-number";

/// What happens when a watched element crosses its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Add the `visible` class
    Reveal,
    /// Start a count-up animation of the element's number
    Counter,
}

/// One row of the registration table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchedElement {
    /// Observed element
    pub element: ElementId,
    /// Minimum visible fraction, in `[0, 1]`
    pub threshold: f64,
    /// Action to run on crossing
    pub kind: TriggerKind,
}

/// Outcome of a threshold crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Element received the `visible` class
    Revealed(ElementId),
    /// Counter animation started towards `target`
    CounterStarted {
        /// Counter element
        element: ElementId,
        /// Final value
        target: u64,
    },
    /// Counter crossed but had no number or had already animated
    CounterSkipped(ElementId),
}

#[derive(Debug, Clone)]
struct RunningCounter {
    element: ElementId,
    animation: CounterAnimation,
}

/// Registration table plus the counters it has started
#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    watched: Vec<WatchedElement>,
    running: Vec<RunningCounter>,
    counter_duration_ms: f64,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(1500.0)
    }
}

impl VisibilityTrigger {
    /// Creates an empty trigger whose counters run for `counter_duration_ms`
    #[must_use]
    pub fn new(counter_duration_ms: f64) -> Self {
        Self {
            watched: Vec::new(),
            running: Vec::new(),
            counter_duration_ms,
        }
    }

    /// Starts watching `element` for `kind`
    ///
    /// An element may hold one registration per kind, so a counter that also
    /// fades in is watched twice. Registering a pair that is already watched
    /// leaves the existing row in place and returns `false`.
    pub fn register(&mut self, element: ElementId, threshold: f64, kind: TriggerKind) -> bool {
        if self.is_registered(element, kind) {
            return false;
        }
        self.watched.push(WatchedElement {
            element,
            threshold: threshold.clamp(0.0, 1.0),
            kind,
        });
        trace!(%element, threshold, ?kind, "registered");
        true
    }

    /// Stops watching `element` for `kind`
    pub fn unregister(&mut self, element: ElementId, kind: TriggerKind) -> bool {
        let before = self.watched.len();
        self.watched.retain(|w| !(w.element == element && w.kind == kind));
        before != self.watched.len()
    }

    /// Whether `element` is currently watched for `kind`
    #[must_use]
    pub fn is_registered(&self, element: ElementId, kind: TriggerKind) -> bool {
        self.watched.iter().any(|w| w.element == element && w.kind == kind)
    }

    /// Current registrations
    #[must_use]
    pub fn watched(&self) -> &[WatchedElement] {
        &self.watched
    }

    /// Number of counters still animating
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Whether the host should schedule another animation frame
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.running.is_empty()
    }

    /// Clears the `visible` class from `elements` and registers them again
    ///
    /// Used when a hidden panel is switched in, so its content animates anew.
    /// Only reveal rows are touched; counters keep their own registration.
    pub fn rearm(&mut self, doc: &mut dyn HostDocument, elements: &[ElementId], threshold: f64) {
        for &element in elements {
            doc.remove_class(element, REVEALED_CLASS);
            self.register(element, threshold, TriggerKind::Reveal);
        }
    }

    /// Measures every watched element and fires those past their threshold
    ///
    /// Registrations whose element has left the document are dropped.
    pub fn check(&mut self, doc: &mut dyn HostDocument) -> Vec<TriggerEvent> {
        let viewport = doc.viewport();
        let mut crossed = Vec::new();
        self.watched.retain(|w| {
            if !doc.contains(w.element) {
                return false;
            }
            let Some(rect) = doc.bounding_rect(w.element) else {
                return true;
            };
            let fraction = viewport.visible_fraction(&rect);
            if fraction > 0.0 && fraction >= w.threshold {
                crossed.push(*w);
                false
            } else {
                true
            }
        });
        crossed
            .into_iter()
            .map(|w| self.on_threshold_crossed(doc, w))
            .collect()
    }

    fn on_threshold_crossed(
        &mut self,
        doc: &mut dyn HostDocument,
        watched: WatchedElement,
    ) -> TriggerEvent {
        let element = watched.element;
        match watched.kind {
            TriggerKind::Reveal => {
                doc.add_class(element, REVEALED_CLASS);
                debug!(%element, "revealed");
                TriggerEvent::Revealed(element)
            }
            TriggerKind::Counter => self.start_counter(doc, element),
        }
    }

    fn start_counter(&mut self, doc: &mut dyn HostDocument, element: ElementId) -> TriggerEvent {
        if doc.attribute(element, ANIMATED_ATTR).is_some() {
            return TriggerEvent::CounterSkipped(element);
        }
        let text = doc.text(element).unwrap_or_default();
        let Some(animation) = CounterAnimation::from_text(&text, self.counter_duration_ms) else {
            debug!(%element, %text, "counter has no number");
            return TriggerEvent::CounterSkipped(element);
        };
        doc.set_attribute(element, ANIMATED_ATTR, "true");
        let target = animation.target();
        debug!(%element, target, "counter started");
        self.running.push(RunningCounter { element, animation });
        TriggerEvent::CounterStarted { element, target }
    }

    /// Advances every running counter to `now`, writing the displayed text
    ///
    /// Counters whose element was removed are dropped without a write.
    /// Returns the number of counters still running.
    pub fn tick(&mut self, doc: &mut dyn HostDocument, now: f64) -> usize {
        self.running.retain_mut(|counter| {
            if !doc.contains(counter.element) {
                return false;
            }
            let Some(frame) = counter.animation.tick(now) else {
                return false;
            };
            doc.set_text(counter.element, &frame.text);
            trace!(element = %counter.element, value = frame.value, "counter tick");
            if frame.finished {
                debug!(element = %counter.element, "counter done");
            }
            !frame.finished
        });
        self.running.len()
    }

    /// Drops every registration and running counter
    pub fn clear(&mut self) {
        self.watched.clear();
        self.running.clear();
    }
}

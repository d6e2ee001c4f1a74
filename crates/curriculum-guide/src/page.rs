//! Page context: wires every behaviour to a host document
//!
//! [`CurriculumPage`] owns the host document, the preference store and all
//! page state. The host forwards DOM events through
//! [`CurriculumPage::handle_event`] and animation frames through
//! [`CurriculumPage::frame`]; it keeps requesting frames while
//! [`CurriculumPage::needs_frame`] is true.
//!
//! # Example
//!
//! ```rust
//! use curriculum_guide::prelude::*;
//!
//! let dom = MockDom::curriculum_page();
//! let mut page = CurriculumPage::init(dom, MemoryStore::new(), PageConfig::default()).unwrap();
//!
//! let counter = page.doc().element_by_id("credit-total").unwrap();
//! page.doc_mut().set_scroll_y(900.0);
//! page.handle_event(PageEvent::Scroll { scroll_y: 900.0 });
//! page.frame(0.0);
//! page.frame(1500.0);
//! assert_eq!(page.doc().text(counter).as_deref(), Some("192"));
//! ```

use tracing::{debug, info};

use crate::config::PageConfig;
use crate::core::effects::{
    self, EffectScheduler, HOVER_CARD_CLASS, RIPPLE_CLASSES, TAG_CLASS,
};
use crate::core::groups::{GroupKind, GroupRegistry, Selection};
use crate::core::preferences::{PreferenceStore, Preferences, LAST_TAB_KEY};
use crate::core::scroll::{AnchorLinks, BackToTop, Parallax};
use crate::core::trigger::{
    TriggerEvent, TriggerKind, VisibilityTrigger, COUNTER_CLASS, REVEAL_CLASSES,
};
use crate::error::PageResult;
use crate::host::{ElementId, HostDocument};

/// Logged once the page is wired up
pub const PAGE_LOADED_MESSAGE: &str = "2022 개정 교육과정 안내 페이지가 로드되었습니다.";

/// Input forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Click on an element carrying a page listener
    Click {
        /// Element whose listener fired
        target: ElementId,
        /// Pointer x in viewport coordinates
        client_x: f64,
        /// Pointer y in viewport coordinates
        client_y: f64,
        /// Event timestamp, on the frame clock
        time: f64,
    },
    /// Pointer entered an element
    MouseEnter(ElementId),
    /// Pointer left an element
    MouseLeave(ElementId),
    /// Window scrolled; the host has already applied `scroll_y`
    Scroll {
        /// New vertical scroll offset
        scroll_y: f64,
    },
    /// Viewport resized
    Resize,
    /// Layout changed without scrolling (fonts, images, host mutations)
    LayoutChanged,
}

impl PageEvent {
    /// Click without pointer coordinates
    #[must_use]
    pub const fn click(target: ElementId, time: f64) -> Self {
        Self::Click {
            target,
            client_x: 0.0,
            client_y: 0.0,
            time,
        }
    }
}

/// What an event did to the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    /// Group selection the click made
    pub selection: Option<Selection>,
    /// Threshold crossings observed afterwards
    pub triggered: Vec<TriggerEvent>,
    /// Anchor target scrolled into view
    pub scrolled_to: Option<ElementId>,
    /// Ripple element created by the click
    pub ripple: Option<ElementId>,
    /// Whether the back-to-top button is showing after a scroll
    pub back_to_top_visible: Option<bool>,
}

/// Curriculum guide page bound to a host document
#[derive(Debug)]
pub struct CurriculumPage<D, S> {
    doc: D,
    preferences: Preferences<S>,
    config: PageConfig,
    trigger: VisibilityTrigger,
    groups: GroupRegistry,
    back_to_top: Option<BackToTop>,
    parallax: Option<Parallax>,
    anchors: AnchorLinks,
    effects: EffectScheduler,
    keyframes: Option<ElementId>,
    restored_tab: Option<String>,
}

impl<D: HostDocument, S: PreferenceStore> CurriculumPage<D, S> {
    /// Wires every page behaviour present in `doc`
    ///
    /// Each behaviour is set up independently; a page without a header,
    /// tabs or counters simply skips that behaviour. Only an invalid
    /// `config` is an error.
    pub fn init(mut doc: D, store: S, config: PageConfig) -> PageResult<Self> {
        config.validate()?;
        let preferences = Preferences::new(store, config.preference_prefix.clone());

        let mut trigger = VisibilityTrigger::new(config.counter_duration_ms);
        for element in doc.query_classes(&REVEAL_CLASSES) {
            trigger.register(element, config.reveal_threshold, TriggerKind::Reveal);
        }
        for element in doc.query_classes(&[COUNTER_CLASS]) {
            trigger.register(element, config.counter_threshold, TriggerKind::Counter);
        }

        let groups = GroupRegistry::discover(&doc);
        let back_to_top = BackToTop::attach(&mut doc, config.back_to_top_threshold_px);
        let parallax = Parallax::attach(&doc, config.parallax_rate);
        let anchors = AnchorLinks::discover(&doc);
        let keyframes = effects::inject_ripple_keyframes(&mut doc);
        let staggered = effects::apply_stagger(&mut doc, config.stagger_step_secs);

        let mut page = Self {
            doc,
            preferences,
            config,
            trigger,
            groups,
            back_to_top,
            parallax,
            anchors,
            effects: EffectScheduler::new(),
            keyframes,
            restored_tab: None,
        };
        page.restore_last_tab();
        let scroll_y = page.doc.scroll_y();
        page.on_scroll(scroll_y);
        let initial = page.trigger.check(&mut page.doc);

        info!(
            watched = page.trigger.watched().len(),
            revealed = initial.len(),
            anchors = page.anchors.links().len(),
            staggered,
            "{PAGE_LOADED_MESSAGE}"
        );
        Ok(page)
    }

    fn restore_last_tab(&mut self) {
        let Some(saved) = self.preferences.load(LAST_TAB_KEY) else {
            return;
        };
        let Some(tabs) = self.groups.group(GroupKind::Tab) else {
            return;
        };
        let restorable = tabs
            .position(&saved)
            .and_then(|index| tabs.members().get(index))
            .is_some_and(|member| member.panel().is_some());
        if !restorable {
            debug!(tab = %saved, "saved tab no longer on page");
            return;
        }
        if self
            .groups
            .activate_key(&mut self.doc, GroupKind::Tab, &saved)
            .is_some()
        {
            debug!(tab = %saved, "restored last tab");
            self.restored_tab = Some(saved);
        }
    }

    /// Applies one host event
    pub fn handle_event(&mut self, event: PageEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        match event {
            PageEvent::Click {
                target,
                client_x,
                client_y,
                time,
            } => self.on_click(target, client_x, client_y, time, &mut outcome),
            PageEvent::MouseEnter(target) => self.on_hover(target, true),
            PageEvent::MouseLeave(target) => self.on_hover(target, false),
            PageEvent::Scroll { scroll_y } => {
                outcome.back_to_top_visible = self.on_scroll(scroll_y);
                outcome.triggered = self.trigger.check(&mut self.doc);
            }
            PageEvent::Resize | PageEvent::LayoutChanged => {
                outcome.triggered = self.trigger.check(&mut self.doc);
            }
        }
        outcome
    }

    fn on_click(
        &mut self,
        target: ElementId,
        client_x: f64,
        client_y: f64,
        time: f64,
        outcome: &mut EventOutcome,
    ) {
        if let Some(selection) = self.groups.activate_control(&mut self.doc, target) {
            self.after_selection(&selection);
            outcome.selection = Some(selection);
        }

        if self.anchors.contains(target) {
            outcome.scrolled_to = self.anchors.follow(&mut self.doc, target);
        }

        if let Some(button) = &self.back_to_top {
            if button.button() == target {
                button.activate(&mut self.doc);
            }
        }

        if self.doc.has_class(target, TAG_CLASS) {
            effects::press_tag(
                &mut self.doc,
                &mut self.effects,
                target,
                time,
                self.config.tag_press_ms,
            );
        }

        if RIPPLE_CLASSES.iter().any(|c| self.doc.has_class(target, c)) {
            outcome.ripple = effects::spawn_ripple(
                &mut self.doc,
                &mut self.effects,
                target,
                client_x,
                client_y,
                time,
                self.config.ripple_ms,
            );
        }

        if outcome.selection.is_some() || outcome.scrolled_to.is_some() {
            if outcome.scrolled_to.is_some() {
                let scroll_y = self.doc.scroll_y();
                outcome.back_to_top_visible = self.on_scroll(scroll_y);
            }
            outcome.triggered = self.trigger.check(&mut self.doc);
        }
    }

    fn after_selection(&mut self, selection: &Selection) {
        if selection.kind.rearms_reveals() {
            if let Some(panel) = selection.panel {
                let elements = self.doc.query_classes_within(panel, &REVEAL_CLASSES);
                self.trigger
                    .rearm(&mut self.doc, &elements, self.config.reveal_threshold);
            }
        }
        if selection.kind == GroupKind::Tab {
            self.preferences.save(LAST_TAB_KEY, &selection.key);
        }
    }

    fn on_hover(&mut self, target: ElementId, entering: bool) {
        if self.doc.has_class(target, HOVER_CARD_CLASS) {
            effects::hover_card(&mut self.doc, target, entering);
        }
    }

    fn on_scroll(&mut self, scroll_y: f64) -> Option<bool> {
        if let Some(parallax) = &self.parallax {
            parallax.update(&mut self.doc, scroll_y);
        }
        self.back_to_top
            .as_ref()
            .map(|button| button.update(&mut self.doc, scroll_y))
    }

    /// Advances counters and runs due effects at `now`
    ///
    /// Returns whether another frame is needed.
    pub fn frame(&mut self, now: f64) -> bool {
        self.trigger.tick(&mut self.doc, now);
        self.effects.run_due(&mut self.doc, now);
        self.needs_frame()
    }

    /// Whether counters are running or effects are pending
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.trigger.needs_frame() || !self.effects.is_empty()
    }

    /// Opens the host print dialog
    pub fn print_page(&mut self) {
        self.doc.print();
    }

    /// Unwires the page, returning the document and preference store
    ///
    /// Pending effects are applied immediately so no temporary element or
    /// pressed transform is left behind.
    pub fn teardown(mut self) -> (D, S) {
        self.effects.run_due(&mut self.doc, f64::INFINITY);
        if let Some(style) = self.keyframes.take() {
            self.doc.remove(style);
        }
        if let Some(button) = self.back_to_top.take() {
            button.detach(&mut self.doc);
        }
        self.trigger.clear();
        self.groups.clear();
        info!("curriculum page torn down");
        (self.doc, self.preferences.into_store())
    }

    /// Host document
    #[must_use]
    pub fn doc(&self) -> &D {
        &self.doc
    }

    /// Mutable host document, for hosts that apply scroll or layout changes
    pub fn doc_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Visibility registrations and running counters
    #[must_use]
    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }

    /// Discovered UI groups
    #[must_use]
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Preference store view
    #[must_use]
    pub fn preferences(&self) -> &Preferences<S> {
        &self.preferences
    }

    /// Back-to-top button, if the page has a body to put it in
    #[must_use]
    pub fn back_to_top(&self) -> Option<&BackToTop> {
        self.back_to_top.as_ref()
    }

    /// Pending timed effects
    #[must_use]
    pub fn effects(&self) -> &EffectScheduler {
        &self.effects
    }

    /// Tab restored from preferences at init
    #[must_use]
    pub fn restored_tab(&self) -> Option<&str> {
        self.restored_tab.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::groups::ACTIVE_CLASS;
    use crate::core::preferences::MemoryStore;
    use crate::core::trigger::REVEALED_CLASS;
    use crate::dom::{DomElement, HostCall, MockDom};

    fn page() -> CurriculumPage<MockDom, MemoryStore> {
        CurriculumPage::init(
            MockDom::curriculum_page(),
            MemoryStore::new(),
            PageConfig::default(),
        )
        .unwrap()
    }

    fn id(page: &CurriculumPage<MockDom, MemoryStore>, name: &str) -> ElementId {
        page.doc().element_by_id(name).unwrap()
    }

    #[test]
    fn test_init_registers_and_reveals_above_fold() {
        let page = page();
        let title = id(&page, "overview-title");
        let lead = id(&page, "overview-lead");
        let figure = id(&page, "overview-figure");
        let intro = id(&page, "tab-high-intro");
        assert!(page.doc().has_class(title, REVEALED_CLASS));
        assert!(page.doc().has_class(lead, REVEALED_CLASS));
        assert!(page.doc().has_class(figure, REVEALED_CLASS));
        assert!(!page.doc().has_class(intro, REVEALED_CLASS));
        assert!(page.trigger().is_registered(intro, TriggerKind::Reveal));
        assert!(!page.trigger().is_registered(title, TriggerKind::Reveal));
    }

    #[test]
    fn test_init_injects_chrome() {
        let page = page();
        let button = page.back_to_top().unwrap().button();
        assert!(page.back_to_top().unwrap().was_created());
        assert!(!page.doc().has_class(button, REVEALED_CLASS));
        let head = page.doc().head().unwrap();
        assert_eq!(page.doc().children(head).len(), 1);
        let card = id(&page, "school-card-2");
        assert_eq!(page.doc().style(card, "transition-delay").as_deref(), Some("0.1s"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PageConfig::default().with_reveal_threshold(2.0);
        let result = CurriculumPage::init(MockDom::new(), MemoryStore::new(), config);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document_initialises() {
        let page = CurriculumPage::init(MockDom::new(), MemoryStore::new(), PageConfig::default())
            .unwrap();
        assert!(page.groups().is_empty());
        assert!(page.trigger().watched().is_empty());
        assert!(!page.needs_frame());
    }

    #[test]
    fn test_scroll_updates_chrome() {
        let mut page = page();
        page.doc_mut().set_scroll_y(500.0);
        let outcome = page.handle_event(PageEvent::Scroll { scroll_y: 500.0 });
        assert_eq!(outcome.back_to_top_visible, Some(true));
        let header = id(&page, "top");
        assert_eq!(
            page.doc().style(header, "background-position-y").as_deref(),
            Some("150px")
        );
        let total = id(&page, "credit-total");
        assert!(outcome.triggered.contains(&TriggerEvent::CounterStarted {
            element: total,
            target: 192
        }));
    }

    #[test]
    fn test_tab_click_saves_and_rearms() {
        let mut page = page();
        let button = id(&page, "tab-btn-middle");
        let intro = id(&page, "tab-middle-intro");
        assert!(page.trigger().is_registered(intro, TriggerKind::Reveal));

        page.doc_mut().set_scroll_y(1300.0);
        let outcome = page.handle_event(PageEvent::click(button, 10.0));
        let selection = outcome.selection.unwrap();
        assert_eq!(selection.kind, GroupKind::Tab);
        assert_eq!(selection.key, "tab-middle");
        assert!(page.doc().has_class(id(&page, "tab-middle"), ACTIVE_CLASS));
        assert!(!page.doc().has_class(id(&page, "tab-high"), ACTIVE_CLASS));
        assert_eq!(
            page.preferences().store().raw("curriculum_lastTab"),
            Some("tab-middle")
        );
        assert!(outcome.triggered.contains(&TriggerEvent::Revealed(intro)));
        assert!(outcome.ripple.is_some());
    }

    #[test]
    fn test_switching_back_replays_reveal() {
        let mut page = page();
        page.doc_mut().set_scroll_y(1300.0);
        let middle = id(&page, "tab-btn-middle");
        let high = id(&page, "tab-btn-high");
        let intro = id(&page, "tab-high-intro");
        page.handle_event(PageEvent::Scroll { scroll_y: 1300.0 });
        assert!(page.doc().has_class(intro, REVEALED_CLASS));

        page.handle_event(PageEvent::click(middle, 0.0));
        let outcome = page.handle_event(PageEvent::click(high, 0.0));
        assert!(outcome.triggered.contains(&TriggerEvent::Revealed(intro)));
        assert!(page.doc().has_class(intro, REVEALED_CLASS));
    }

    #[test]
    fn test_restore_last_tab() {
        let store = MemoryStore::new().with_value("curriculum_lastTab", "tab-middle");
        let page = CurriculumPage::init(MockDom::curriculum_page(), store, PageConfig::default())
            .unwrap();
        assert_eq!(page.restored_tab(), Some("tab-middle"));
        assert!(page.doc().has_class(id(&page, "tab-btn-middle"), ACTIVE_CLASS));
        assert!(!page.doc().has_class(id(&page, "tab-btn-high"), ACTIVE_CLASS));
    }

    #[test]
    fn test_restore_skips_tab_without_panel() {
        let store = MemoryStore::new().with_value("curriculum_lastTab", "tab-orphan");
        let page = CurriculumPage::init(MockDom::curriculum_page(), store, PageConfig::default())
            .unwrap();
        assert!(page.restored_tab().is_none());
        assert!(page.doc().has_class(id(&page, "tab-btn-high"), ACTIVE_CLASS));
    }

    #[test]
    fn test_unavailable_store_does_not_block_init() {
        let mut page = CurriculumPage::init(
            MockDom::curriculum_page(),
            MemoryStore::unavailable(),
            PageConfig::default(),
        )
        .unwrap();
        let button = id(&page, "tab-btn-middle");
        let outcome = page.handle_event(PageEvent::click(button, 0.0));
        assert!(outcome.selection.is_some());
    }

    #[test]
    fn test_subject_without_panel_does_not_rearm() {
        let mut page = page();
        let art = id(&page, "subject-btn-art");
        let before = page.trigger().watched().len();
        let outcome = page.handle_event(PageEvent::click(art, 0.0));
        assert!(outcome.selection.unwrap().panel.is_none());
        assert_eq!(page.trigger().watched().len(), before);
        assert!(page.doc().has_class(art, ACTIVE_CLASS));
    }

    #[test]
    fn test_anchor_click_scrolls() {
        let mut page = page();
        let link = id(&page, "nav-credits");
        let outcome = page.handle_event(PageEvent::click(link, 0.0));
        let credits = id(&page, "credits");
        assert_eq!(outcome.scrolled_to, Some(credits));
        assert_eq!(outcome.back_to_top_visible, Some(true));
        assert!(outcome
            .triggered
            .iter()
            .any(|e| matches!(e, TriggerEvent::CounterStarted { .. })));
    }

    #[test]
    fn test_back_to_top_click() {
        let mut page = page();
        page.doc_mut().set_scroll_y(900.0);
        let button = page.back_to_top().unwrap().button();
        page.handle_event(PageEvent::click(button, 0.0));
        assert_eq!(page.doc().host_calls(), &[HostCall::ScrollToTop]);
        assert_eq!(page.doc().scroll_y(), 0.0);
    }

    #[test]
    fn test_existing_back_to_top_reused() {
        let mut dom = MockDom::curriculum_page();
        let existing = dom.mount_in_body(DomElement::new("button").with_class("back-to-top"));
        let page = CurriculumPage::init(dom, MemoryStore::new(), PageConfig::default()).unwrap();
        assert_eq!(page.back_to_top().unwrap().button(), existing);
        let (dom, _) = page.teardown();
        assert!(dom.contains(existing));
    }

    #[test]
    fn test_hover_only_affects_cards() {
        let mut page = page();
        let card = id(&page, "school-card-1");
        let tag = id(&page, "tag-1");
        page.handle_event(PageEvent::MouseEnter(card));
        page.handle_event(PageEvent::MouseEnter(tag));
        assert_eq!(
            page.doc().style(card, "transform").as_deref(),
            Some("translateY(-10px)")
        );
        assert!(page.doc().style(tag, "transform").is_none());
        page.handle_event(PageEvent::MouseLeave(card));
        assert_eq!(page.doc().style(card, "transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_tag_press_resets_on_frame() {
        let mut page = page();
        let tag = id(&page, "tag-1");
        page.handle_event(PageEvent::click(tag, 1000.0));
        assert_eq!(page.doc().style(tag, "transform").as_deref(), Some("scale(0.95)"));
        assert!(page.needs_frame());
        assert!(page.frame(1050.0));
        assert!(!page.frame(1100.0));
        assert_eq!(page.doc().style(tag, "transform").as_deref(), Some("scale(1)"));
    }

    #[test]
    fn test_ripple_removed_after_lifetime() {
        let mut page = page();
        page.doc_mut().set_scroll_y(3000.0);
        let button = id(&page, "card-btn-1");
        let outcome = page.handle_event(PageEvent::Click {
            target: button,
            client_x: 80.0,
            client_y: 320.0,
            time: 0.0,
        });
        let ripple = outcome.ripple.unwrap();
        assert_eq!(page.doc().parent(ripple), Some(button));
        assert_eq!(page.doc().style(ripple, "width").as_deref(), Some("160px"));
        assert_eq!(page.doc().style(ripple, "top").as_deref(), Some("-60px"));
        page.frame(599.0);
        assert!(page.doc().contains(ripple));
        page.frame(600.0);
        assert!(!page.doc().contains(ripple));
    }

    #[test]
    fn test_accordion_click() {
        let mut page = page();
        let header = id(&page, "faq-2-header");
        let item = id(&page, "faq-2");
        page.handle_event(PageEvent::click(header, 0.0));
        assert!(page.doc().has_class(item, ACTIVE_CLASS));
        let outcome = page.handle_event(PageEvent::click(header, 0.0));
        assert!(!outcome.selection.unwrap().active);
        assert!(!page.doc().has_class(item, ACTIVE_CLASS));
    }

    #[test]
    fn test_print_delegates() {
        let mut page = page();
        page.print_page();
        assert_eq!(page.doc().host_calls(), &[HostCall::Print]);
    }

    #[test]
    fn test_teardown_cleans_up() {
        let mut page = page();
        let tag = id(&page, "tag-1");
        page.handle_event(PageEvent::click(tag, 0.0));
        let button = page.back_to_top().unwrap().button();
        let (dom, store) = page.teardown();
        let head = dom.head().unwrap();
        assert!(dom.children(head).is_empty());
        assert!(!dom.contains(button));
        assert_eq!(dom.style(tag, "transform").as_deref(), Some("scale(1)"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_resize_rechecks() {
        let mut page = page();
        let intro = id(&page, "tab-high-intro");
        page.doc_mut()
            .set_viewport(crate::core::geometry::Viewport::new(1280.0, 1800.0));
        let outcome = page.handle_event(PageEvent::Resize);
        assert!(outcome.triggered.contains(&TriggerEvent::Revealed(intro)));
    }
}

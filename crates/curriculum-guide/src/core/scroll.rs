//! Scroll-driven chrome: back-to-top button, header parallax, anchor links

use tracing::debug;

use super::trigger::REVEALED_CLASS;
use crate::host::{ElementId, HostDocument};

/// Class of the back-to-top button
pub const BACK_TO_TOP_CLASS: &str = "back-to-top";

/// Class of the parallax header
pub const HEADER_CLASS: &str = "main-header";

/// Label of a generated back-to-top button
pub const BACK_TO_TOP_LABEL: &str = "맨 위로 이동";

/// Floating button shown once the page is scrolled past a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct BackToTop {
    button: ElementId,
    created: bool,
    threshold_px: f64,
}

impl BackToTop {
    /// Uses the page's `.back-to-top` button, creating one in `<body>` if absent
    pub fn attach(doc: &mut dyn HostDocument, threshold_px: f64) -> Option<Self> {
        if let Some(button) = doc.query_classes(&[BACK_TO_TOP_CLASS]).into_iter().next() {
            return Some(Self {
                button,
                created: false,
                threshold_px,
            });
        }
        let body = doc.body()?;
        let button = doc.create_child(body, "button")?;
        doc.add_class(button, BACK_TO_TOP_CLASS);
        doc.set_text(button, "↑");
        doc.set_attribute(button, "aria-label", BACK_TO_TOP_LABEL);
        debug!(%button, "created back-to-top button");
        Some(Self {
            button,
            created: true,
            threshold_px,
        })
    }

    /// Button element
    #[must_use]
    pub const fn button(&self) -> ElementId {
        self.button
    }

    /// Whether the button was generated rather than found
    #[must_use]
    pub const fn was_created(&self) -> bool {
        self.created
    }

    /// Whether the button should show at `scroll_y`
    #[must_use]
    pub fn should_show(&self, scroll_y: f64) -> bool {
        scroll_y > self.threshold_px
    }

    /// Shows or hides the button for `scroll_y`; returns the new visibility
    pub fn update(&self, doc: &mut dyn HostDocument, scroll_y: f64) -> bool {
        let show = self.should_show(scroll_y);
        if show {
            doc.add_class(self.button, REVEALED_CLASS);
        } else {
            doc.remove_class(self.button, REVEALED_CLASS);
        }
        show
    }

    /// Scrolls to the top of the page
    pub fn activate(&self, doc: &mut dyn HostDocument) {
        doc.scroll_to_top();
    }

    /// Removes a generated button; a page-authored one is left in place
    pub fn detach(self, doc: &mut dyn HostDocument) {
        if self.created {
            doc.remove(self.button);
        }
    }
}

/// Header background offset for `scroll_y`
#[must_use]
pub fn parallax_offset(scroll_y: f64, rate: f64) -> f64 {
    scroll_y * rate
}

/// Header whose background scrolls slower than the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    header: ElementId,
    rate: f64,
}

impl Parallax {
    /// Binds to the page's `.main-header`, if present
    #[must_use]
    pub fn attach(doc: &dyn HostDocument, rate: f64) -> Option<Self> {
        let header = doc.query_classes(&[HEADER_CLASS]).into_iter().next()?;
        Some(Self { header, rate })
    }

    /// Header element
    #[must_use]
    pub const fn header(&self) -> ElementId {
        self.header
    }

    /// Writes `background-position-y` for `scroll_y`
    pub fn update(&self, doc: &mut dyn HostDocument, scroll_y: f64) -> f64 {
        let offset = parallax_offset(scroll_y, self.rate);
        doc.set_style(self.header, "background-position-y", &format!("{offset}px"));
        offset
    }
}

/// In-page anchor links (`href` starting with `#`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorLinks {
    links: Vec<ElementId>,
}

impl AnchorLinks {
    /// Collects every in-page anchor in `doc`
    #[must_use]
    pub fn discover(doc: &dyn HostDocument) -> Self {
        Self {
            links: doc.query_links_with_prefix("#"),
        }
    }

    /// Collected links
    #[must_use]
    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    /// Whether `element` is one of the collected links
    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.links.contains(&element)
    }

    /// Element the link points at, if it exists
    #[must_use]
    pub fn target(doc: &dyn HostDocument, link: ElementId) -> Option<ElementId> {
        let href = doc.attribute(link, "href")?;
        let fragment = href.strip_prefix('#')?;
        doc.element_by_id(fragment)
    }

    /// Smooth-scrolls to the link's target; returns it when found
    pub fn follow(&self, doc: &mut dyn HostDocument, link: ElementId) -> Option<ElementId> {
        if !self.contains(link) {
            return None;
        }
        let target = Self::target(doc, link)?;
        doc.scroll_into_view(target);
        debug!(%link, %target, "anchor scroll");
        Some(target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::{DomElement, HostCall, MockDom};

    #[test]
    fn test_back_to_top_created_when_missing() {
        let mut dom = MockDom::curriculum_page();
        let btn = BackToTop::attach(&mut dom, 300.0).unwrap();
        assert!(btn.was_created());
        let el = dom.element(btn.button()).unwrap();
        assert_eq!(el.tag, "button");
        assert_eq!(el.text_content, "↑");
        assert_eq!(el.get_attr("aria-label"), Some(BACK_TO_TOP_LABEL));
        assert_eq!(dom.parent(btn.button()), dom.body());
    }

    #[test]
    fn test_back_to_top_reuses_existing() {
        let mut dom = MockDom::new();
        let existing = dom.mount_in_body(DomElement::new("a").with_class(BACK_TO_TOP_CLASS));
        let btn = BackToTop::attach(&mut dom, 300.0).unwrap();
        assert!(!btn.was_created());
        assert_eq!(btn.button(), existing);
        btn.detach(&mut dom);
        assert!(dom.contains(existing));
    }

    #[test]
    fn test_back_to_top_visibility_threshold() {
        let mut dom = MockDom::new();
        let btn = BackToTop::attach(&mut dom, 300.0).unwrap();
        assert!(!btn.update(&mut dom, 300.0));
        assert!(!dom.has_class(btn.button(), REVEALED_CLASS));
        assert!(btn.update(&mut dom, 301.0));
        assert!(dom.has_class(btn.button(), REVEALED_CLASS));
        assert!(!btn.update(&mut dom, 0.0));
        assert!(!dom.has_class(btn.button(), REVEALED_CLASS));
    }

    #[test]
    fn test_back_to_top_activate_and_detach() {
        let mut dom = MockDom::new();
        dom.set_scroll_y(900.0);
        let btn = BackToTop::attach(&mut dom, 300.0).unwrap();
        btn.activate(&mut dom);
        assert_eq!(dom.host_calls(), &[HostCall::ScrollToTop]);
        assert_eq!(dom.scroll_y(), 0.0);
        let id = btn.button();
        btn.detach(&mut dom);
        assert!(!dom.contains(id));
    }

    #[test]
    fn test_parallax() {
        let mut dom = MockDom::curriculum_page();
        let parallax = Parallax::attach(&dom, 0.3).unwrap();
        let offset = parallax.update(&mut dom, 200.0);
        assert!((offset - 60.0).abs() < 1e-9);
        let style = dom.style(parallax.header(), "background-position-y").unwrap();
        assert!(style.starts_with("60"));
        assert!(style.ends_with("px"));
    }

    #[test]
    fn test_parallax_absent_header() {
        let dom = MockDom::new();
        assert!(Parallax::attach(&dom, 0.3).is_none());
        assert_eq!(parallax_offset(100.0, 0.5), 50.0);
    }

    #[test]
    fn test_anchor_follow() {
        let mut dom = MockDom::curriculum_page();
        let links = AnchorLinks::discover(&dom);
        let nav = dom.element_by_id("nav-credits").unwrap();
        let target = links.follow(&mut dom, nav).unwrap();
        assert_eq!(Some(target), dom.element_by_id("credits"));
        assert_eq!(dom.host_calls(), &[HostCall::ScrollIntoView(target)]);
    }

    #[test]
    fn test_anchor_bare_and_missing_skipped() {
        let mut dom = MockDom::curriculum_page();
        let links = AnchorLinks::discover(&dom);
        let bare = dom.element_by_id("nav-bare").unwrap();
        let missing = dom.element_by_id("nav-missing").unwrap();
        let external = dom.element_by_id("nav-external").unwrap();
        assert!(links.follow(&mut dom, bare).is_none());
        assert!(links.follow(&mut dom, missing).is_none());
        assert!(links.follow(&mut dom, external).is_none());
        assert!(dom.host_calls().is_empty());
    }
}

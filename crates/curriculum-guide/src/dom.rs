//! Mock DOM for headless page testing
//!
//! An in-memory element tree implementing [`HostDocument`], so every page
//! behaviour can be exercised without a browser. Elements carry explicit
//! layout rectangles in document coordinates; the mock derives viewport
//! rectangles from the scroll offset and hides panels the page's stylesheet
//! would hide (`.tab-content`, `.grade-content` and `.subject-content`
//! without `active`).

use std::collections::{BTreeMap, HashMap};

use crate::core::geometry::{Rect, Viewport};
use crate::host::{ElementId, HostDocument};

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Inline style properties
    pub style: BTreeMap<String, String>,
    /// Whether element is displayed
    pub visible: bool,
    /// Layout box in document coordinates; `None` means no box
    pub layout: Option<Rect>,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            visible: true,
            layout: None,
            children: Vec::new(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets the layout box (document coordinates)
    #[must_use]
    pub fn with_layout(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.layout = Some(Rect::new(x, y, width, height));
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Sets text content
    pub fn set_text(&mut self, text: &str) {
        self.text_content = text.to_string();
    }

    /// Adds a class
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Gets an inline style value
    #[must_use]
    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(|s| s.as_str())
    }
}

/// Opaque host service invoked by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    /// `scrollIntoView` on an element
    ScrollIntoView(ElementId),
    /// `scrollTo({ top: 0 })`
    ScrollToTop,
    /// `print()`
    Print,
}

#[derive(Debug, Clone)]
struct MockNode {
    element: DomElement,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
}

/// Classes the page stylesheet hides unless the element is also `active`
pub const CONDITIONAL_PANEL_CLASSES: [&str; 3] = ["tab-content", "grade-content", "subject-content"];

/// Mock DOM for testing the page without a browser
#[derive(Debug)]
pub struct MockDom {
    nodes: Vec<MockNode>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    viewport: Viewport,
    scroll_y: f64,
    conditional_classes: Vec<String>,
    host_calls: Vec<HostCall>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Creates an empty document with `<html>`, `<head>` and `<body>`
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            viewport: Viewport::default(),
            scroll_y: 0.0,
            conditional_classes: CONDITIONAL_PANEL_CLASSES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            host_calls: Vec::new(),
        };
        dom.root = dom.insert(None, DomElement::new("html"));
        dom.head = dom.insert(Some(dom.root), DomElement::new("head"));
        dom.body = dom.insert(Some(dom.root), DomElement::new("body"));
        dom
    }

    fn insert(&mut self, parent: Option<ElementId>, mut element: DomElement) -> ElementId {
        let children = std::mem::take(&mut element.children);
        let id = ElementId(self.nodes.len());
        self.nodes.push(MockNode {
            element,
            parent,
            children: Vec::new(),
            attached: true,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        for child in children {
            self.insert(Some(id), child);
        }
        id
    }

    fn node(&self, id: ElementId) -> Option<&MockNode> {
        self.nodes.get(id.0).filter(|n| n.attached)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut MockNode> {
        self.nodes.get_mut(id.0).filter(|n| n.attached)
    }

    /// Appends an element tree under `parent`, returning the new subtree root
    pub fn mount(&mut self, parent: ElementId, element: DomElement) -> Option<ElementId> {
        self.node(parent)?;
        Some(self.insert(Some(parent), element))
    }

    /// Appends an element tree to `<body>`
    pub fn mount_in_body(&mut self, element: DomElement) -> ElementId {
        self.insert(Some(self.body), element)
    }

    /// Gets an attached element
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&DomElement> {
        self.node(id).map(|n| &n.element)
    }

    /// Gets a mutable attached element
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut DomElement> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// Children of an element, in order
    #[must_use]
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.node(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    /// Sets the viewport size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Sets the window scroll offset
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    /// Moves an element's layout box
    pub fn set_layout(&mut self, id: ElementId, rect: Rect) {
        if let Some(element) = self.element_mut(id) {
            element.layout = Some(rect);
        }
    }

    /// Host services invoked so far
    #[must_use]
    pub fn host_calls(&self) -> &[HostCall] {
        &self.host_calls
    }

    /// Clears the host service log
    pub fn clear_host_calls(&mut self) {
        self.host_calls.clear();
    }

    /// Gets element text by ID attribute
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        let found = self.element_by_id(id)?;
        self.element(found).map(|e| e.text_content.as_str())
    }

    /// First element carrying `class`
    #[must_use]
    pub fn first_by_class(&self, class: &str) -> Option<ElementId> {
        self.query_classes(&[class]).into_iter().next()
    }

    /// Whether the element would produce a layout box in a browser
    #[must_use]
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                return false;
            };
            if !node.element.visible {
                return false;
            }
            let conditional = self
                .conditional_classes
                .iter()
                .any(|c| node.element.has_class(c));
            if conditional && !node.element.has_class("active") {
                return false;
            }
            current = node.parent;
        }
        true
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    fn document_order(&self) -> Vec<ElementId> {
        let mut all = vec![self.root];
        all.extend(self.descendants(self.root));
        all
    }

    /// Builds the curriculum guide page used by the scenario tests
    ///
    /// Layout (document y, 1280x720 viewport):
    ///
    /// ```text
    ///    0  header.main-header + nav anchors
    ///  400  #overview    .fade-in / .fade-in-left / .scale-in
    /// 1000  #credits     .credit-number x3 ("192", "1,234명", "학점")
    /// 1400  tabs         .tab-btn x2, .tab-content x2 (school cards)
    /// 2100  grades       .grade-btn x2, .grade-content x2
    /// 2400  subjects     .subject-btn x3 (one without a panel)
    /// 2800  accordion    .accordion-item x3
    /// 3200  tags, card button, change items, time card
    /// 3600  footer
    /// ```
    #[must_use]
    pub fn curriculum_page() -> Self {
        let mut dom = Self::new();

        let header = DomElement::new("header")
            .with_id("top")
            .with_class("main-header")
            .with_layout(0.0, 0.0, 1280.0, 400.0)
            .with_child(
                DomElement::new("nav")
                    .with_layout(0.0, 340.0, 1280.0, 60.0)
                    .with_child(
                        DomElement::new("a")
                            .with_id("nav-overview")
                            .with_attr("href", "#overview")
                            .with_text("개요")
                            .with_layout(0.0, 340.0, 120.0, 60.0),
                    )
                    .with_child(
                        DomElement::new("a")
                            .with_id("nav-credits")
                            .with_attr("href", "#credits")
                            .with_text("학점")
                            .with_layout(120.0, 340.0, 120.0, 60.0),
                    )
                    .with_child(
                        DomElement::new("a")
                            .with_id("nav-bare")
                            .with_attr("href", "#")
                            .with_text("맨 위")
                            .with_layout(240.0, 340.0, 120.0, 60.0),
                    )
                    .with_child(
                        DomElement::new("a")
                            .with_id("nav-missing")
                            .with_attr("href", "#missing")
                            .with_text("없음")
                            .with_layout(360.0, 340.0, 120.0, 60.0),
                    )
                    .with_child(
                        DomElement::new("a")
                            .with_id("nav-external")
                            .with_attr("href", "https://example.org/")
                            .with_text("외부")
                            .with_layout(480.0, 340.0, 120.0, 60.0),
                    ),
            );

        let overview = DomElement::new("section")
            .with_id("overview")
            .with_layout(0.0, 400.0, 1280.0, 600.0)
            .with_child(
                DomElement::new("h2")
                    .with_id("overview-title")
                    .with_class("fade-in")
                    .with_text("2022 개정 교육과정")
                    .with_layout(0.0, 450.0, 1280.0, 80.0),
            )
            .with_child(
                DomElement::new("p")
                    .with_id("overview-lead")
                    .with_class("fade-in-left")
                    .with_layout(0.0, 560.0, 1280.0, 100.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("overview-figure")
                    .with_class("scale-in")
                    .with_layout(0.0, 700.0, 1280.0, 200.0),
            );

        let credits = DomElement::new("section")
            .with_id("credits")
            .with_layout(0.0, 1000.0, 1280.0, 400.0)
            .with_child(
                DomElement::new("div")
                    .with_id("credit-total")
                    .with_class("credit-number")
                    .with_text("192")
                    .with_layout(0.0, 1050.0, 300.0, 60.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("credit-students")
                    .with_class("credit-number")
                    .with_text("1,234명")
                    .with_layout(0.0, 1120.0, 300.0, 60.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("credit-label")
                    .with_class("credit-number")
                    .with_text("학점")
                    .with_layout(0.0, 1190.0, 300.0, 60.0),
            );

        let tabs = DomElement::new("section")
            .with_id("tabs")
            .with_layout(0.0, 1400.0, 1280.0, 700.0)
            .with_child(
                DomElement::new("button")
                    .with_id("tab-btn-high")
                    .with_class("tab-btn")
                    .with_class("active")
                    .with_attr("data-tab", "tab-high")
                    .with_text("고등학교")
                    .with_layout(0.0, 1400.0, 200.0, 50.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("tab-btn-middle")
                    .with_class("tab-btn")
                    .with_attr("data-tab", "tab-middle")
                    .with_text("중학교")
                    .with_layout(200.0, 1400.0, 200.0, 50.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("tab-btn-orphan")
                    .with_class("tab-btn")
                    .with_attr("data-tab", "tab-orphan")
                    .with_text("준비 중")
                    .with_layout(400.0, 1400.0, 200.0, 50.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("tab-high")
                    .with_class("tab-content")
                    .with_class("active")
                    .with_layout(0.0, 1460.0, 1280.0, 600.0)
                    .with_child(
                        DomElement::new("div")
                            .with_id("tab-high-intro")
                            .with_class("fade-in")
                            .with_layout(0.0, 1500.0, 1280.0, 200.0),
                    )
                    .with_child(
                        DomElement::new("div")
                            .with_id("school-card-1")
                            .with_class("school-card")
                            .with_layout(0.0, 1720.0, 400.0, 300.0),
                    )
                    .with_child(
                        DomElement::new("div")
                            .with_id("school-card-2")
                            .with_class("school-card")
                            .with_layout(420.0, 1720.0, 400.0, 300.0),
                    ),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("tab-middle")
                    .with_class("tab-content")
                    .with_layout(0.0, 1460.0, 1280.0, 600.0)
                    .with_child(
                        DomElement::new("div")
                            .with_id("tab-middle-intro")
                            .with_class("fade-in")
                            .with_class("feature-item")
                            .with_layout(0.0, 1500.0, 1280.0, 200.0),
                    ),
            );

        let grades = DomElement::new("section")
            .with_id("grades")
            .with_layout(0.0, 2100.0, 1280.0, 300.0)
            .with_child(
                DomElement::new("button")
                    .with_id("grade-btn-1")
                    .with_class("grade-btn")
                    .with_class("active")
                    .with_attr("data-grade", "grade-1")
                    .with_text("1학년")
                    .with_layout(0.0, 2100.0, 150.0, 40.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("grade-btn-2")
                    .with_class("grade-btn")
                    .with_attr("data-grade", "grade-2")
                    .with_text("2학년")
                    .with_layout(150.0, 2100.0, 150.0, 40.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("grade-1")
                    .with_class("grade-content")
                    .with_class("active")
                    .with_layout(0.0, 2150.0, 1280.0, 250.0)
                    .with_child(
                        DomElement::new("div")
                            .with_class("grade-card")
                            .with_layout(0.0, 2150.0, 400.0, 200.0),
                    ),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("grade-2")
                    .with_class("grade-content")
                    .with_layout(0.0, 2150.0, 1280.0, 250.0),
            );

        let subjects = DomElement::new("section")
            .with_id("subjects")
            .with_layout(0.0, 2400.0, 1280.0, 400.0)
            .with_child(
                DomElement::new("button")
                    .with_id("subject-btn-korean")
                    .with_class("subject-btn")
                    .with_class("active")
                    .with_attr("data-subject", "korean")
                    .with_layout(0.0, 2400.0, 150.0, 40.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("subject-btn-math")
                    .with_class("subject-btn")
                    .with_attr("data-subject", "math")
                    .with_layout(150.0, 2400.0, 150.0, 40.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("subject-btn-art")
                    .with_class("subject-btn")
                    .with_attr("data-subject", "art")
                    .with_layout(300.0, 2400.0, 150.0, 40.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("subject-korean")
                    .with_class("subject-content")
                    .with_class("active")
                    .with_attr("data-subject", "korean")
                    .with_layout(0.0, 2450.0, 1280.0, 300.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("subject-math")
                    .with_class("subject-content")
                    .with_attr("data-subject", "math")
                    .with_layout(0.0, 2450.0, 1280.0, 300.0)
                    .with_child(
                        DomElement::new("div")
                            .with_id("subject-math-detail")
                            .with_class("fade-in-right")
                            .with_layout(0.0, 2460.0, 1280.0, 200.0),
                    ),
            );

        let mut accordion = DomElement::new("section")
            .with_id("faq")
            .with_layout(0.0, 2800.0, 1280.0, 400.0);
        for i in 1..=3 {
            let y = 2800.0 + f64::from(i - 1) * 100.0;
            accordion = accordion.with_child(
                DomElement::new("div")
                    .with_id(&format!("faq-{i}"))
                    .with_class("accordion-item")
                    .with_layout(0.0, y, 1280.0, 100.0)
                    .with_child(
                        DomElement::new("button")
                            .with_id(&format!("faq-{i}-header"))
                            .with_class("accordion-header")
                            .with_text(&format!("질문 {i}"))
                            .with_layout(0.0, y, 1280.0, 40.0),
                    )
                    .with_child(
                        DomElement::new("div")
                            .with_class("accordion-body")
                            .with_text(&format!("답변 {i}"))
                            .with_layout(0.0, y + 40.0, 1280.0, 60.0),
                    ),
            );
        }

        let extras = DomElement::new("section")
            .with_id("extras")
            .with_layout(0.0, 3200.0, 1280.0, 400.0)
            .with_child(
                DomElement::new("span")
                    .with_id("tag-1")
                    .with_class("tag")
                    .with_text("#고교학점제")
                    .with_layout(0.0, 3200.0, 120.0, 30.0),
            )
            .with_child(
                DomElement::new("span")
                    .with_id("tag-2")
                    .with_class("tag")
                    .with_text("#진로")
                    .with_layout(130.0, 3200.0, 120.0, 30.0),
            )
            .with_child(
                DomElement::new("button")
                    .with_id("card-btn-1")
                    .with_class("card-btn")
                    .with_text("자세히")
                    .with_layout(0.0, 3300.0, 160.0, 40.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("change-1")
                    .with_class("change-item")
                    .with_layout(0.0, 3400.0, 600.0, 80.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("change-2")
                    .with_class("change-item")
                    .with_layout(640.0, 3400.0, 600.0, 80.0),
            )
            .with_child(
                DomElement::new("div")
                    .with_id("time-1")
                    .with_class("time-card")
                    .with_layout(0.0, 3500.0, 600.0, 80.0),
            );

        let footer = DomElement::new("footer")
            .with_id("footer")
            .with_layout(0.0, 3600.0, 1280.0, 400.0);

        for section in [header, overview, credits, tabs, grades, subjects, accordion, extras, footer] {
            dom.mount_in_body(section);
        }
        dom
    }
}

impl HostDocument for MockDom {
    fn query_classes(&self, classes: &[&str]) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| {
                self.element(*id)
                    .is_some_and(|e| classes.iter().any(|c| e.has_class(c)))
            })
            .collect()
    }

    fn query_classes_within(&self, root: ElementId, classes: &[&str]) -> Vec<ElementId> {
        if self.node(root).is_none() {
            return Vec::new();
        }
        self.descendants(root)
            .into_iter()
            .filter(|id| {
                self.element(*id)
                    .is_some_and(|e| classes.iter().any(|c| e.has_class(c)))
            })
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.document_order()
            .into_iter()
            .find(|e| self.element(*e).is_some_and(|el| el.id == id))
    }

    fn query_class_with_attr(&self, class: &str, name: &str, value: &str) -> Option<ElementId> {
        self.query_classes(&[class])
            .into_iter()
            .find(|id| self.element(*id).and_then(|e| e.get_attr(name)) == Some(value))
    }

    fn query_links_with_prefix(&self, prefix: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| {
                self.element(*id).is_some_and(|e| {
                    e.tag == "a" && e.get_attr("href").is_some_and(|h| h.starts_with(prefix))
                })
            })
            .collect()
    }

    fn body(&self) -> Option<ElementId> {
        Some(self.body)
    }

    fn head(&self) -> Option<ElementId> {
        Some(self.head)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|n| n.parent)
    }

    fn contains(&self, element: ElementId) -> bool {
        self.node(element).is_some()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element).is_some_and(|e| e.has_class(class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element_mut(element) {
            e.add_class(class);
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element_mut(element) {
            e.remove_class(class);
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let e = self.element(element)?;
        match name {
            "id" if !e.id.is_empty() => Some(e.id.clone()),
            "class" => Some(e.classes.join(" ")),
            _ => e.get_attr(name).map(str::to_string),
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(element) {
            if name == "id" {
                e.id = value.to_string();
            } else {
                e.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.element(element).map(|e| e.text_content.clone())
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(e) = self.element_mut(element) {
            e.set_text(text);
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(e) = self.element_mut(element) {
            e.style.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.element(element)
            .and_then(|e| e.get_style(property))
            .map(str::to_string)
    }

    fn create_child(&mut self, parent: ElementId, tag: &str) -> Option<ElementId> {
        self.mount(parent, DomElement::new(tag))
    }

    fn remove(&mut self, element: ElementId) {
        if self.node(element).is_none() || element == self.root {
            return;
        }
        if let Some(parent) = self.nodes[element.0].parent {
            self.nodes[parent.0].children.retain(|c| *c != element);
        }
        let mut doomed = vec![element];
        doomed.extend(self.descendants(element));
        for id in doomed {
            self.nodes[id.0].attached = false;
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        if !self.is_rendered(element) {
            return None;
        }
        self.element(element)?
            .layout
            .map(|r| r.translated(0.0, -self.scroll_y))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        self.host_calls.push(HostCall::ScrollIntoView(element));
        if let Some(y) = self.element(element).and_then(|e| e.layout).map(|r| r.y) {
            self.set_scroll_y(y);
        }
    }

    fn scroll_to_top(&mut self) {
        self.host_calls.push(HostCall::ScrollToTop);
        self.scroll_y = 0.0;
    }

    fn print(&mut self) {
        self.host_calls.push(HostCall::Print);
    }
}

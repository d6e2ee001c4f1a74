//! Host document abstraction
//!
//! The page logic never touches a browser API directly. Everything it needs
//! from the environment goes through [`HostDocument`]: element lookup,
//! class/attribute/text/style mutation, layout geometry and the opaque
//! scroll/print services. [`crate::dom::MockDom`] implements it in memory;
//! the `wasm` feature implements it over `web_sys`.

use std::fmt;

use crate::core::geometry::{Rect, Viewport};

/// Opaque handle to an element owned by a host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Document tree, layout and navigation services provided by the host
///
/// Lookups return `Option`/`Vec` rather than errors: a missing element is an
/// expected condition on this page and callers simply skip the action.
/// Mutations on a removed element are no-ops.
pub trait HostDocument {
    /// Elements carrying any of `classes`, in document order
    fn query_classes(&self, classes: &[&str]) -> Vec<ElementId>;

    /// Descendants of `root` carrying any of `classes`, in document order
    fn query_classes_within(&self, root: ElementId, classes: &[&str]) -> Vec<ElementId>;

    /// Element whose `id` attribute equals `id`
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// First element with `class` whose attribute `name` equals `value`
    fn query_class_with_attr(&self, class: &str, name: &str, value: &str) -> Option<ElementId>;

    /// Anchor elements whose `href` starts with `prefix`, in document order
    fn query_links_with_prefix(&self, prefix: &str) -> Vec<ElementId>;

    /// `<body>` element
    fn body(&self) -> Option<ElementId>;

    /// `<head>` element
    fn head(&self) -> Option<ElementId>;

    /// Parent of `element`
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Whether `element` is still attached to the document
    fn contains(&self, element: ElementId) -> bool;

    /// Whether `element` carries `class`
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Adds `class` to `element`
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Removes `class` from `element`
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Attribute value
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Sets an attribute
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Text content
    fn text(&self, element: ElementId) -> Option<String>;

    /// Replaces text content
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Sets an inline style property (CSS property name, e.g. `transition-delay`)
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// Inline style property value
    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Creates `tag` and appends it to `parent`
    fn create_child(&mut self, parent: ElementId, tag: &str) -> Option<ElementId>;

    /// Detaches `element` from the document
    fn remove(&mut self, element: ElementId);

    /// Bounding box relative to the viewport, `None` when not rendered
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Vertical scroll offset of the window
    fn scroll_y(&self) -> f64;

    /// Smoothly scrolls `element` to the top of the viewport
    fn scroll_into_view(&mut self, element: ElementId);

    /// Smoothly scrolls the window to the top
    fn scroll_to_top(&mut self);

    /// Opens the print dialog
    fn print(&mut self);
}

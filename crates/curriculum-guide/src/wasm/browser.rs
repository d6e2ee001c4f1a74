//! Browser bindings for the curriculum page
//!
//! [`BrowserDocument`] implements [`HostDocument`] over `web_sys`, handing out
//! [`ElementId`]s from an arena of live `Element`s. [`start`] wires the page
//! when the module loads; load it after the document has been parsed
//! (`<script type="module">` or `defer`).

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Storage, Window,
};

use crate::config::PageConfig;
use crate::core::effects::{HOVER_CARD_CLASS, RIPPLE_CLASSES, TAG_CLASS};
use crate::core::geometry::{Rect, Viewport};
use crate::core::groups::GroupKind;
use crate::core::preferences::PreferenceStore;
use crate::error::{PageError, PageResult};
use crate::host::{ElementId, HostDocument};
use crate::page::{CurriculumPage, PageEvent, PAGE_LOADED_MESSAGE};

fn class_selector(classes: &[&str]) -> String {
    classes
        .iter()
        .map(|class| format!(".{class}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_js(err: PageError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn ignore_js_error(context: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        debug!(context, error = ?err, "dom call failed");
    }
}

/// Handle slots; a released slot is handed out again by the next intern
#[derive(Debug)]
struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T: PartialEq + Clone> Arena<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn intern(&mut self, value: T) -> usize {
        if let Some(index) = self.slots.iter().position(|slot| slot.as_ref() == Some(&value)) {
            return index;
        }
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(value);
                return index;
            }
        }
        self.slots.push(Some(value));
        self.slots.len() - 1
    }

    fn get(&self, index: usize) -> Option<T> {
        self.slots.get(index)?.clone()
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        Some(value)
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// Live browser document
#[derive(Debug)]
pub struct BrowserDocument {
    window: Window,
    document: Document,
    elements: RefCell<Arena<Element>>,
}

impl BrowserDocument {
    /// Binds to the current window's document
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Host`] outside a browser window or when the
    /// window has no document.
    pub fn from_window() -> PageResult<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::host("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::host("window has no document"))?;
        Ok(Self {
            window,
            document,
            elements: RefCell::new(Arena::new()),
        })
    }

    /// Handle for `element`, reusing an existing one for the same node
    pub fn intern(&self, element: Element) -> ElementId {
        ElementId(self.elements.borrow_mut().intern(element))
    }

    /// Element behind a handle
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0)
    }

    /// Number of elements currently held by handles
    #[must_use]
    pub fn interned(&self) -> usize {
        self.elements.borrow().live()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn select_all(&self, root: Option<&Element>, selector: &str) -> Vec<ElementId> {
        let list = match root {
            Some(root) => root.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = list else {
            warn!(selector, "invalid selector");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }
}

impl HostDocument for BrowserDocument {
    fn query_classes(&self, classes: &[&str]) -> Vec<ElementId> {
        if classes.is_empty() {
            return Vec::new();
        }
        self.select_all(None, &class_selector(classes))
    }

    fn query_classes_within(&self, root: ElementId, classes: &[&str]) -> Vec<ElementId> {
        let Some(root) = self.element(root) else {
            return Vec::new();
        };
        if classes.is_empty() {
            return Vec::new();
        }
        self.select_all(Some(&root), &class_selector(classes))
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.document.get_element_by_id(id).map(|e| self.intern(e))
    }

    fn query_class_with_attr(&self, class: &str, name: &str, value: &str) -> Option<ElementId> {
        self.query_classes(&[class])
            .into_iter()
            .find(|id| self.attribute(*id, name).as_deref() == Some(value))
    }

    fn query_links_with_prefix(&self, prefix: &str) -> Vec<ElementId> {
        self.select_all(None, "a[href]")
            .into_iter()
            .filter(|id| {
                self.attribute(*id, "href")
                    .is_some_and(|href| href.starts_with(prefix))
            })
            .collect()
    }

    fn body(&self) -> Option<ElementId> {
        self.document.body().map(|body| self.intern(body.into()))
    }

    fn head(&self) -> Option<ElementId> {
        self.document.head().map(|head| self.intern(head.into()))
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.element(element)?.parent_element()?;
        Some(self.intern(parent))
    }

    fn contains(&self, element: ElementId) -> bool {
        self.element(element).is_some_and(|e| e.is_connected())
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element(element) {
            ignore_js_error("add class", e.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element(element) {
            ignore_js_error("remove class", e.class_list().remove_1(class));
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element(element) {
            ignore_js_error("set attribute", e.set_attribute(name, value));
        }
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.element(element)?.text_content()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(e) = self.element(element) {
            e.set_text_content(Some(text));
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(e) = self.html(element) {
            ignore_js_error("set style", e.style().set_property(property, value));
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        let value = self.html(element)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn create_child(&mut self, parent: ElementId, tag: &str) -> Option<ElementId> {
        let parent = self.element(parent)?;
        let child = self.document.create_element(tag).ok()?;
        parent.append_child(&child).ok()?;
        Some(self.intern(child))
    }

    fn remove(&mut self, element: ElementId) {
        // The handle is dead after this; its slot goes back to the arena.
        if let Some(e) = self.elements.borrow_mut().release(element.0) {
            e.remove();
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let element = self.element(element)?;
        if !element.is_connected() || element.get_client_rects().length() == 0 {
            return None;
        }
        let rect = element.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(width), Some(height)) => Viewport::new(width, height),
            _ => Viewport::default(),
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        if let Some(e) = self.element(element) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            e.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn print(&mut self) {
        ignore_js_error("print", self.window.print());
    }
}

/// Preferences in `window.localStorage`
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    /// Opens the window's local storage; access errors surface on use
    #[must_use]
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    fn storage(&self) -> PageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| PageError::storage("localStorage unavailable"))
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> PageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| PageError::storage(format!("{err:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> PageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| PageError::storage(format!("{err:?}")))
    }
}

type SharedPage = Rc<RefCell<CurriculumPage<BrowserDocument, LocalStorageStore>>>;

thread_local! {
    static PAGE: RefCell<Option<SharedPage>> = const { RefCell::new(None) };
}

/// `requestAnimationFrame` loop that runs only while the page asks for frames
struct FrameLoop {
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<bool>,
}

impl FrameLoop {
    fn new(page: SharedPage) -> Rc<Self> {
        let frames = Rc::new(Self {
            callback: RefCell::new(None),
            pending: Cell::new(false),
        });
        let weak = Rc::downgrade(&frames);
        *frames.callback.borrow_mut() = Some(Closure::new(move |now: f64| {
            let Some(frames) = weak.upgrade() else {
                return;
            };
            frames.pending.set(false);
            if page.borrow_mut().frame(now) {
                frames.request();
            }
        }));
        frames
    }

    fn request(&self) {
        if self.pending.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(callback) = self.callback.borrow().as_ref() {
            if window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .is_ok()
            {
                self.pending.set(true);
            }
        }
    }
}

fn now(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

fn dispatch(page: &SharedPage, frames: &FrameLoop, event: PageEvent) {
    let needs_frame = {
        let mut page = page.borrow_mut();
        page.handle_event(event);
        page.needs_frame()
    };
    if needs_frame {
        frames.request();
    }
}

fn listen<E>(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire(page: &SharedPage, frames: &Rc<FrameLoop>, window: &Window) -> Result<(), JsValue> {
    let (clickable, anchors, cards) = {
        let page = page.borrow();
        let doc = page.doc();
        let mut classes: Vec<&str> = GroupKind::ALL.iter().map(|k| k.control_class()).collect();
        classes.push(TAG_CLASS);
        classes.extend(RIPPLE_CLASSES);
        let mut clickable: BTreeSet<ElementId> = doc.query_classes(&classes).into_iter().collect();
        let anchors: BTreeSet<ElementId> = doc.query_links_with_prefix("#").into_iter().collect();
        clickable.extend(anchors.iter().copied());
        if let Some(button) = page.back_to_top() {
            clickable.insert(button.button());
        }
        let cards = doc.query_classes(&[HOVER_CARD_CLASS]);
        let resolve = |ids: Vec<ElementId>| -> Vec<(ElementId, Element)> {
            ids.into_iter()
                .filter_map(|id| doc.element(id).map(|e| (id, e)))
                .collect()
        };
        (
            resolve(clickable.into_iter().collect()),
            anchors,
            resolve(cards),
        )
    };

    for (target, element) in clickable {
        let (page, frames, window) = (page.clone(), frames.clone(), window.clone());
        let is_anchor = anchors.contains(&target);
        listen(&element, "click", move |event: MouseEvent| {
            if is_anchor {
                event.prevent_default();
            }
            let click = PageEvent::Click {
                target,
                client_x: f64::from(event.client_x()),
                client_y: f64::from(event.client_y()),
                time: now(&window),
            };
            dispatch(&page, &frames, click);
        })?;
    }

    for (card, element) in cards {
        let (enter_page, enter_frames) = (page.clone(), frames.clone());
        listen(&element, "mouseenter", move |_: web_sys::Event| {
            dispatch(&enter_page, &enter_frames, PageEvent::MouseEnter(card));
        })?;
        let (leave_page, leave_frames) = (page.clone(), frames.clone());
        listen(&element, "mouseleave", move |_: web_sys::Event| {
            dispatch(&leave_page, &leave_frames, PageEvent::MouseLeave(card));
        })?;
    }

    {
        let (page, frames, scroller) = (page.clone(), frames.clone(), window.clone());
        listen(window, "scroll", move |_: web_sys::Event| {
            let scroll_y = scroller.scroll_y().unwrap_or(0.0);
            dispatch(&page, &frames, PageEvent::Scroll { scroll_y });
        })?;
    }
    {
        let (page, frames) = (page.clone(), frames.clone());
        listen(window, "resize", move |_: web_sys::Event| {
            dispatch(&page, &frames, PageEvent::Resize);
        })?;
    }
    {
        let (page, frames) = (page.clone(), frames.clone());
        listen(window, "load", move |_: web_sys::Event| {
            dispatch(&page, &frames, PageEvent::LayoutChanged);
        })?;
    }
    Ok(())
}

/// Wires the page into the current document
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = BrowserDocument::from_window().map_err(to_js)?;
    let window = document.window.clone();
    let page = CurriculumPage::init(document, LocalStorageStore::from_window(), PageConfig::default())
        .map_err(to_js)?;
    let page: SharedPage = Rc::new(RefCell::new(page));
    let frames = FrameLoop::new(page.clone());
    wire(&page, &frames, &window)?;
    if page.borrow().needs_frame() {
        frames.request();
    }
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));

    console::log_1(&PAGE_LOADED_MESSAGE.into());
    Ok(())
}

/// Opens the print dialog; exposed to page scripts as `printPage()`
#[wasm_bindgen(js_name = printPage)]
pub fn print_page() {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow().as_ref() {
            page.borrow_mut().print_page();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_selector() {
        assert_eq!(class_selector(&["fade-in"]), ".fade-in");
        assert_eq!(
            class_selector(&["tab-btn", "grade-btn", "card-btn"]),
            ".tab-btn, .grade-btn, .card-btn"
        );
        assert_eq!(class_selector(&[]), "");
    }

    #[test]
    fn test_arena_reuses_existing_handle() {
        let mut arena = Arena::new();
        let a = arena.intern("header");
        let b = arena.intern("footer");
        assert_ne!(a, b);
        assert_eq!(arena.intern("header"), a);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_arena_released_slot_reused() {
        let mut arena = Arena::new();
        let body = arena.intern("body");
        for _ in 0..100 {
            let ripple = arena.intern("ripple");
            assert_eq!(arena.release(ripple), Some("ripple"));
            assert_eq!(arena.get(ripple), None);
        }
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.slots.len(), 2);
        assert_eq!(arena.get(body), Some("body"));
        assert_eq!(arena.release(body), Some("body"));
        assert_eq!(arena.release(body), None);
        assert_eq!(arena.live(), 0);
    }
}

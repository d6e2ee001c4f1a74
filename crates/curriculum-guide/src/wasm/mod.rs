//! WASM frontend for the curriculum page
//!
//! Binds the headless page logic to a real browser document. Everything
//! here is a thin adapter; behaviour is tested through [`crate::dom::MockDom`].

mod browser;

pub use browser::{print_page, start, BrowserDocument, LocalStorageStore};

//! Curriculum Page Walkthrough
//!
//! Drives the mock curriculum page through a typical visit and prints what
//! the page does at each step. Set `RUST_LOG=curriculum_guide=debug` to see
//! the page's own tracing output.
//!
//! Run with: cargo run --example page_walkthrough

#![allow(clippy::unwrap_used)]

use curriculum_guide::prelude::*;
use tracing_subscriber::EnvFilter;

fn show_counters(page: &CurriculumPage<MockDom, MemoryStore>, now: f64) {
    let texts: Vec<&str> = ["credit-total", "credit-students", "credit-label"]
        .iter()
        .filter_map(|id| page.doc().get_element_text(id))
        .collect();
    println!("   t={now:>6.0}ms  {}", texts.join("  |  "));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("📄 Curriculum guide page walkthrough");
    println!("────────────────────────────────────");

    let store = MemoryStore::new();
    let mut page =
        CurriculumPage::init(MockDom::curriculum_page(), store, PageConfig::default()).unwrap();
    println!(
        "\n1️⃣  Loaded: {} elements watched, {} groups",
        page.trigger().watched().len(),
        GroupKind::ALL
            .iter()
            .filter(|k| page.groups().group(**k).is_some())
            .count()
    );

    println!("\n2️⃣  Scrolling to the credits section");
    page.doc_mut().set_scroll_y(900.0);
    let outcome = page.handle_event(PageEvent::Scroll { scroll_y: 900.0 });
    for event in &outcome.triggered {
        println!("   {event:?}");
    }
    let mut now = 0.0;
    while page.frame(now) {
        if (now as u64) % 500 == 0 {
            show_counters(&page, now);
        }
        now += 250.0;
    }
    show_counters(&page, now);

    println!("\n3️⃣  Switching to the middle school tab");
    let middle = page.doc().element_by_id("tab-btn-middle").unwrap();
    let outcome = page.handle_event(PageEvent::click(middle, now));
    if let Some(selection) = &outcome.selection {
        println!("   selected {} ({})", selection.key, selection.kind);
    }
    while page.frame(now) {
        now += 100.0;
    }

    println!("\n4️⃣  Back to top");
    let button = page.back_to_top().unwrap().button();
    page.handle_event(PageEvent::click(button, now));
    println!("   host calls: {:?}", page.doc().host_calls());

    let (_, store) = page.teardown();
    println!(
        "\n5️⃣  Saved preference: curriculum_lastTab = {:?}",
        store.raw("curriculum_lastTab")
    );

    let page =
        CurriculumPage::init(MockDom::curriculum_page(), store, PageConfig::default()).unwrap();
    println!("   next visit restores: {:?}", page.restored_tab());
}

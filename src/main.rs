//! Aero shell tab reconciliation demo.
//!
//! Runs a scripted browsing session against the in-process loopback host and
//! prints the tab strip after each step. An optional first argument names the
//! settings file to use instead of the platform default.

use aero_shell::app::App;
use aero_shell::channel::loopback::LoopbackHost;
use aero_shell::logging;
use aero_shell::services::settings_engine::SettingsEngine;
use aero_shell::types::geometry::{Point, TabBounds};
use aero_shell::types::state::BrowserState;

const TAB_WIDTH: f64 = 120.0;
const TAB_HEIGHT: f64 = 32.0;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_strip(state: &BrowserState) {
    for tab in &state.tabs {
        let marker = if state.active_label.as_deref() == Some(tab.label.as_str()) {
            "▶"
        } else {
            " "
        };
        let loading = if tab.is_loading { " (loading)" } else { "" };
        println!("  {} {:<8} {:<24} {}{}", marker, tab.label, tab.title, tab.url, loading);
    }
    if state.active_label.is_none() {
        println!("  (no active tab)");
    }
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut engine = SettingsEngine::new(std::env::args().nth(1));
    let settings = engine.load_or_default();
    logging::init(&settings.logging.filter);

    let (host, mut events) = LoopbackHost::with_default_url("https://www.google.com");
    let app = App::new(&host, settings);

    section("Startup");
    if let Err(e) = app.startup().await {
        eprintln!("  startup failed: {}", e);
        return;
    }
    app.pump_pending(&mut events).await;
    print_strip(&app.snapshot());

    section("Open two more tabs and load pages");
    let mut labels = Vec::new();
    for url in ["github.com", "https://docs.rs"] {
        match app.create_tab(Some(url.to_string())).await {
            Ok(tab) => labels.push(tab.label),
            Err(e) => eprintln!("  create failed: {}", e),
        }
    }
    for label in &labels {
        if let Some(tab) = host.tab(label) {
            host.page_finished(label, &tab.url);
            host.title_changed(label, &tab.url.replace("https://", ""));
        }
    }
    app.pump_pending(&mut events).await;
    print_strip(&app.snapshot());

    section("Ctrl+Tab wraps around");
    let _ = app.dispatch_shortcut("Ctrl+Tab").await;
    app.pump_pending(&mut events).await;
    print_strip(&app.snapshot());

    section("Drag the last tab onto the first");
    let state = app.snapshot();
    let bounds = TabBounds::strip(state.labels(), TAB_WIDTH, TAB_HEIGHT);
    if let (Some(first), Some(last)) = (bounds.first(), bounds.last()) {
        app.pointer_down(&last.label, Point::new(last.rect.x + 10.0, 10.0));
        app.pointer_move(Point::new(first.rect.x + 10.0, 10.0), &bounds);
        match app.pointer_up().await {
            Ok(outcome) => println!("  outcome: {:?}", outcome),
            Err(e) => eprintln!("  reorder failed: {}", e),
        }
    }
    app.pump_pending(&mut events).await;
    print_strip(&app.snapshot());

    section("A page opens a popup");
    host.request_new_window("https://example.com/popup");
    let handled = app.pump_pending(&mut events).await;
    println!("  handled {} events", handled);
    print_strip(&app.snapshot());

    section("Host goes offline; closing fails and nothing changes");
    host.set_offline(true);
    if let Some(active) = app.active_tab() {
        if let Err(e) = app.close_tab(&active.label).await {
            println!("  close failed: {}", e);
        }
    }
    host.set_offline(false);
    print_strip(&app.snapshot());

    section("Close the active tab");
    if let Some(active) = app.active_tab() {
        let _ = app.close_tab(&active.label).await;
    }
    app.pump_pending(&mut events).await;
    print_strip(&app.snapshot());

    println!("  host order:  {:?}", host.labels());
    println!("  shell order: {:?}", app.snapshot().labels());
}

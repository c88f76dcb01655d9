use gloo_events::EventListener;
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{PerformanceNavigationTiming, Window};

use crate::config;
use crate::timing::SharedScheduler;

fn log_page_load(window: &Window) {
    let Some(performance) = window.performance() else {
        return;
    };
    let Some(navigation) = performance
        .get_entries_by_type("navigation")
        .get(0)
        .dyn_into::<PerformanceNavigationTiming>()
        .ok()
    else {
        debug!("No navigation timing entry");
        return;
    };
    info!(
        "Page Load Time: {} ms",
        navigation.load_event_end() - navigation.fetch_start()
    );
}

/// Load-time diagnostics, only on local development hosts.
pub fn wire_diagnostics(window: &Window, scheduler: SharedScheduler) -> Option<EventListener> {
    let hostname = window.location().hostname().unwrap_or_default();
    if !config::is_dev_host(&hostname) {
        return None;
    }
    let handle = window.clone();
    Some(EventListener::new(window, "load", move |_| {
        let window = handle.clone();
        // loadEventEnd is only filled in once the load handlers have returned.
        scheduler.after(0, Box::new(move || log_page_load(&window)));
    }))
}

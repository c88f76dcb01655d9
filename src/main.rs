use creative_stage::{dom, start, Config};
use gloo_events::EventListener;
use log::{error, info, warn};

/// `Document.readyState` is still `"loading"` until the parser is done with the body.
fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn boot() {
    let document = match dom::document() {
        Ok(document) => document,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };
    let config = Config::load(&document).unwrap_or_else(|e| {
        warn!("Falling back to default config: {}", e);
        Config::default()
    });
    match start(config) {
        // The layer lives as long as the page does.
        Ok(layer) => layer.forget(),
        Err(e) => error!("Interaction layer failed to start: {}", e),
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(creative_stage::config::log_level()).expect("error initializing log");

    info!("Starting Creative Stage interactions");
    let Ok(document) = dom::document() else {
        error!("No document to attach to");
        return;
    };
    if still_loading(&document.ready_state()) {
        EventListener::once(&document, "DOMContentLoaded", |_| boot()).forget();
    } else {
        boot();
    }
}

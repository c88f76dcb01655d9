//! Client-side interactions for the Creative Stage marketing site: smooth
//! anchors, the mobile menu, reveal and count-up animations, form feedback,
//! decorative effects and "coming soon" toasts.
//!
//! Everything hangs off [`start`], which wires the current document and
//! returns an [`InteractionLayer`] owning every listener, observer and timer.

use std::rc::Rc;

use gloo_events::EventListener;
use log::{info, warn};

pub mod components {
    pub mod accessibility;
    pub mod actions;
    pub mod ambient;
    pub mod counters;
    pub mod forms;
    pub mod nav;
    pub mod notification;
    pub mod scroll;
}
pub mod config;
pub mod context;
pub mod dom;
pub mod effects;
pub mod error;
pub mod perf;
pub mod timing;

use components::scroll::OneShotObserver;
use components::{accessibility, actions, ambient, forms, nav, scroll};
pub use config::Config;
pub use context::StageContext;
pub use error::InteractionError;
use timing::BrowserScheduler;

/// The wired page. Dropping it (or calling [`InteractionLayer::dispose`])
/// detaches every listener and cancels every pending timer.
pub struct InteractionLayer {
    listeners: Vec<EventListener>,
    observers: Vec<OneShotObserver>,
    scheduler: BrowserScheduler,
}

impl InteractionLayer {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispose(self) {
        drop(self);
    }

    /// Keeps everything running for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for InteractionLayer {
    fn drop(&mut self) {
        self.listeners.clear();
        self.observers.clear();
        self.scheduler.dispose();
    }
}

/// Wires every interaction onto the current document.
pub fn start(config: Config) -> Result<InteractionLayer, InteractionError> {
    let window = dom::window()?;
    let document = window.document().ok_or(InteractionError::NoDocument)?;
    let scheduler = BrowserScheduler::new();
    let ctx = StageContext::new(
        window,
        document,
        config,
        Rc::new(scheduler.clone()),
        timing::page_random(),
    );
    Ok(start_with(&ctx, scheduler))
}

/// Like [`start`] but with a caller-built context. `scheduler` must be the
/// one behind `ctx.scheduler` so disposing the layer cancels its timers.
pub fn start_with(ctx: &StageContext, scheduler: BrowserScheduler) -> InteractionLayer {
    let mut layer = InteractionLayer {
        listeners: Vec::new(),
        observers: Vec::new(),
        scheduler,
    };

    if let Err(e) = effects::inject_keyframes(&ctx.document) {
        warn!("Keyframes not injected: {}", e);
    }

    layer.listeners.extend(nav::wire_smooth_scroll(ctx));
    layer.listeners.extend(effects::wire_feature_cards(ctx));
    layer.listeners.extend(forms::wire_field_feedback(ctx));
    layer.listeners.extend(forms::wire_newsletter(ctx));
    layer.listeners.extend(nav::wire_mobile_menu(ctx));
    layer.listeners.push(scroll::wire_scroll_effects(ctx));
    layer.listeners.extend(effects::wire_paint_cursor(ctx));
    layer.listeners.push(actions::wire_actions(ctx));

    for (name, wired) in [
        ("counters", scroll::wire_counters(ctx)),
        ("reveals", scroll::wire_reveals(ctx)),
    ] {
        match wired {
            Ok(observer) => layer.observers.extend(observer),
            Err(e) => warn!("Viewport {} unavailable: {}", name, e),
        }
    }

    ambient::start_smiles_ticker(ctx);
    ambient::start_icon_wiggle(ctx);

    match accessibility::insert_skip_link(ctx) {
        Ok(listeners) => layer.listeners.extend(listeners),
        Err(e) => warn!("Skip link not inserted: {}", e),
    }
    let labelled = accessibility::label_bare_buttons(ctx);
    layer
        .listeners
        .extend(perf::wire_diagnostics(&ctx.window, ctx.scheduler.clone()));

    info!(
        "Interaction layer ready: {} listeners, {} observers, {} labelled buttons",
        layer.listeners.len(),
        layer.observers.len(),
        labelled
    );
    layer
}

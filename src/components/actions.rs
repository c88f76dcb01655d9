use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::components::notification::{show_notification, ComingSoon};
use crate::context::StageContext;
use crate::dom;

pub const ANNOUNCEMENT_HIDE_MS: u32 = 300;

/// What a `data-action` attribute asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    CloseAnnouncement,
    ComingSoon(ComingSoon),
}

impl PageAction {
    pub fn parse(action: &str) -> Option<Self> {
        if action == "close-announcement" {
            return Some(PageAction::CloseAnnouncement);
        }
        ComingSoon::from_action(action).map(PageAction::ComingSoon)
    }
}

pub fn close_announcement(ctx: &StageContext) {
    let Some(bar) = dom::by_id(&ctx.document, &ctx.config.announcement_id) else {
        return;
    };
    dom::set_style(&bar, "transform", "translateY(-100%)");
    ctx.scheduler.after(
        ANNOUNCEMENT_HIDE_MS,
        Box::new(move || dom::set_style(&bar, "display", "none")),
    );
}

pub fn perform(ctx: &StageContext, action: PageAction) {
    match action {
        PageAction::CloseAnnouncement => close_announcement(ctx),
        PageAction::ComingSoon(feature) => {
            let message = feature.message(&mut *ctx.random.borrow_mut());
            if let Err(e) = show_notification(ctx, &message) {
                warn!("Could not show notification: {}", e);
            }
        }
    }
}

/// One delegated click handler for every `[data-action]` control on the page.
pub fn wire_actions(ctx: &StageContext) -> EventListener {
    let ctx = ctx.clone();
    let document = ctx.document.clone();
    EventListener::new_with_options(
        &document,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(control) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let name = control.get_attribute("data-action").unwrap_or_default();
            match PageAction::parse(&name) {
                Some(action) => {
                    event.prevent_default();
                    perform(&ctx, action);
                }
                None => debug!("Ignoring unknown page action {:?}", name),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(PageAction::parse("close-announcement"), Some(PageAction::CloseAnnouncement));
        assert_eq!(
            PageAction::parse("art-generator"),
            Some(PageAction::ComingSoon(ComingSoon::ArtGenerator))
        );
        assert_eq!(PageAction::parse(""), None);
        assert_eq!(PageAction::parse("Close-Announcement"), None);
    }
}

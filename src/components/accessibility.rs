use gloo_events::EventListener;

use crate::context::StageContext;
use crate::dom;
use crate::error::{InteractionError, Result};

const SKIP_LINK_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "-40px"),
    ("left", "6px"),
    ("background", "var(--color-primary)"),
    ("color", "white"),
    ("padding", "8px"),
    ("border-radius", "4px"),
    ("text-decoration", "none"),
    ("z-index", "10000"),
    ("transition", "top 0.3s"),
];

/// Icon-only buttons need a label screen readers can announce.
pub fn needs_aria_label(aria_label: Option<&str>, text: &str) -> bool {
    aria_label.map_or(true, str::is_empty) && text.trim().is_empty()
}

/// Keyboard users get a "Skip to main content" link that appears on focus.
pub fn insert_skip_link(ctx: &StageContext) -> Result<Vec<EventListener>> {
    let body = ctx.document.body().ok_or(InteractionError::NoBody)?;
    let link = dom::create_html(&ctx.document, "a")?;
    link.set_attribute("href", "#main")?;
    link.set_text_content(Some("Skip to main content"));
    dom::set_styles(&link, SKIP_LINK_STYLES);
    body.insert_before(&link, body.first_child().as_ref())?;

    let focus = EventListener::new(&link, "focus", {
        let link = link.clone();
        move |_| dom::set_style(&link, "top", "6px")
    });
    let blur = EventListener::new(&link, "blur", {
        let link = link.clone();
        move |_| dom::set_style(&link, "top", "-40px")
    });
    Ok(vec![focus, blur])
}

pub fn label_bare_buttons(ctx: &StageContext) -> usize {
    let mut labelled = 0;
    for button in dom::query_all(&ctx.document, "button, .btn") {
        let aria = button.get_attribute("aria-label");
        let text = button.text_content().unwrap_or_default();
        if needs_aria_label(aria.as_deref(), &text) && button.set_attribute("aria-label", "Button").is_ok() {
            labelled += 1;
        }
    }
    labelled
}

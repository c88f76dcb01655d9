use std::cell::Cell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlButtonElement, HtmlInputElement};

use crate::components::notification::{show_notification, SUBSCRIBED_MESSAGE};
use crate::context::StageContext;
use crate::dom::{self, FormField};
use crate::timing::SharedScheduler;

pub const FOCUSED: &str = "focused";
pub const ERROR_MESSAGE: &str = "error-message";
pub const SUBSCRIBING_LABEL: &str = "Subscribing...";
pub const SUBSCRIBED_LABEL: &str = "✓ Subscribed!";

/// Floating labels stay raised while the field holds a value.
pub fn keeps_focus_marker(value: &str) -> bool {
    !value.is_empty()
}

pub fn border_color<'a>(valid: bool, success: &'a str, alert: &'a str) -> &'a str {
    if valid {
        success
    } else {
        alert
    }
}

fn validate(field: &FormField, success: &str, alert: &str) {
    let valid = field.check_validity();
    let element = field.element();
    dom::set_style(element, "border-color", border_color(valid, success, alert));
    if valid {
        if let Some(feedback) = element.next_element_sibling() {
            if feedback.class_list().contains(ERROR_MESSAGE) {
                feedback.remove();
            }
        }
    }
}

fn wire_field(ctx: &StageContext, field: FormField, listeners: &mut Vec<EventListener>) {
    let element = field.element().clone();
    let Some(container) = element.parent_element() else {
        return;
    };

    listeners.push(EventListener::new(&element, "focus", {
        let container = container.clone();
        move |_| {
            let _ = container.class_list().add_1(FOCUSED);
        }
    }));

    listeners.push(EventListener::new(&element, "blur", {
        let field = field.clone();
        move |_| {
            if !keeps_focus_marker(&field.value()) {
                let _ = container.class_list().remove_1(FOCUSED);
            }
        }
    }));

    let success = ctx.config.success_color.clone();
    let alert = ctx.config.alert_color.clone();
    listeners.push(EventListener::new(&element, "input", move |_| {
        validate(&field, &success, &alert);
    }));
}

/// Focus markers and live validity colouring for every field of every form.
pub fn wire_field_feedback(ctx: &StageContext) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for form in dom::query_all(&ctx.document, "form") {
        let Ok(fields) = form.query_selector_all("input, textarea, select") else {
            continue;
        };
        for i in 0..fields.length() {
            let field = fields
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
                .and_then(FormField::from_element);
            if let Some(field) = field {
                wire_field(ctx, field, &mut listeners);
            }
        }
    }
    listeners
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribePhase {
    Idle,
    Subscribing,
    Subscribed,
}

/// The parts of the newsletter form the subscribe flow drives.
pub trait SubscribeView {
    fn show_button(&self, label: &str, disabled: bool, background: Option<&str>);
    fn clear_email(&self);
    fn notify(&self, message: &str);
}

/// Simulated newsletter signup. There is no endpoint: the request always
/// succeeds after a fixed latency.
pub struct SubscribeFlow<V: SubscribeView> {
    view: V,
    phase: Cell<SubscribePhase>,
    idle_label: String,
    success_color: String,
    latency_ms: u32,
    reset_ms: u32,
}

impl<V: SubscribeView + 'static> SubscribeFlow<V> {
    pub fn new(view: V, idle_label: String, success_color: String, latency_ms: u32, reset_ms: u32) -> Self {
        Self {
            view,
            phase: Cell::new(SubscribePhase::Idle),
            idle_label,
            success_color,
            latency_ms,
            reset_ms,
        }
    }

    pub fn phase(&self) -> SubscribePhase {
        self.phase.get()
    }

    /// Starts a signup. Ignored while a previous one is still in flight.
    pub fn submit(self: &Rc<Self>, scheduler: &SharedScheduler) {
        if self.phase.get() != SubscribePhase::Idle {
            return;
        }
        self.phase.set(SubscribePhase::Subscribing);
        self.view.show_button(SUBSCRIBING_LABEL, true, None);

        let flow = self.clone();
        let later = scheduler.clone();
        scheduler.after(
            self.latency_ms,
            Box::new(move || {
                flow.phase.set(SubscribePhase::Subscribed);
                flow.view
                    .show_button(SUBSCRIBED_LABEL, true, Some(flow.success_color.as_str()));
                flow.view.clear_email();
                flow.view.notify(SUBSCRIBED_MESSAGE);

                let reset = flow.clone();
                later.after(
                    flow.reset_ms,
                    Box::new(move || {
                        reset.phase.set(SubscribePhase::Idle);
                        reset.view.show_button(&reset.idle_label, false, None);
                    }),
                );
            }),
        );
    }
}

struct NewsletterView {
    ctx: StageContext,
    button: HtmlButtonElement,
    email: Option<HtmlInputElement>,
}

impl SubscribeView for NewsletterView {
    fn show_button(&self, label: &str, disabled: bool, background: Option<&str>) {
        self.button.set_text_content(Some(label));
        self.button.set_disabled(disabled);
        dom::set_style(&self.button, "background", background.unwrap_or(""));
    }

    fn clear_email(&self) {
        if let Some(email) = &self.email {
            email.set_value("");
        }
    }

    fn notify(&self, message: &str) {
        if let Err(e) = show_notification(&self.ctx, message) {
            warn!("Could not show notification: {}", e);
        }
    }
}

pub fn wire_newsletter(ctx: &StageContext) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for form in dom::query_all(&ctx.document, &ctx.config.newsletter_form_selector) {
        let Some(button) = form
            .query_selector("button")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            debug!("Newsletter form without a button; skipping");
            continue;
        };
        let email = form
            .query_selector("input[type=\"email\"]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let idle_label = button.text_content().unwrap_or_default();
        let view = NewsletterView {
            ctx: ctx.clone(),
            button,
            email,
        };
        let flow = Rc::new(SubscribeFlow::new(
            view,
            idle_label,
            ctx.config.success_color.clone(),
            ctx.config.subscribe_latency_ms,
            ctx.config.subscribe_reset_ms,
        ));

        let scheduler = ctx.scheduler.clone();
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                flow.submit(&scheduler);
            },
        ));
    }
    listeners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::ManualScheduler;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct ButtonSnapshot {
        label: String,
        disabled: bool,
        background: Option<String>,
    }

    #[derive(Default)]
    struct RecordingView {
        button: RefCell<Vec<ButtonSnapshot>>,
        email: RefCell<String>,
        notices: RefCell<Vec<String>>,
    }

    impl RecordingView {
        fn last_button(&self) -> ButtonSnapshot {
            self.button.borrow().last().cloned().expect("button rendered")
        }
    }

    impl SubscribeView for Rc<RecordingView> {
        fn show_button(&self, label: &str, disabled: bool, background: Option<&str>) {
            self.button.borrow_mut().push(ButtonSnapshot {
                label: label.to_string(),
                disabled,
                background: background.map(str::to_string),
            });
        }

        fn clear_email(&self) {
            self.email.borrow_mut().clear();
        }

        fn notify(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    fn flow_with_view() -> (Rc<SubscribeFlow<Rc<RecordingView>>>, Rc<RecordingView>) {
        let view = Rc::new(RecordingView::default());
        *view.email.borrow_mut() = "parent@example.com".to_string();
        let flow = Rc::new(SubscribeFlow::new(
            view.clone(),
            "Subscribe".to_string(),
            "var(--color-success)".to_string(),
            1500,
            3000,
        ));
        (flow, view)
    }

    #[test]
    fn test_subscribe_flow_timeline() {
        let clock = ManualScheduler::new();
        let scheduler: SharedScheduler = Rc::new(clock.clone());
        let (flow, view) = flow_with_view();

        flow.submit(&scheduler);
        assert_eq!(flow.phase(), SubscribePhase::Subscribing);
        assert_eq!(
            view.last_button(),
            ButtonSnapshot {
                label: SUBSCRIBING_LABEL.to_string(),
                disabled: true,
                background: None
            }
        );

        clock.advance(1499);
        assert_eq!(view.email.borrow().as_str(), "parent@example.com");
        clock.advance(1);
        assert_eq!(flow.phase(), SubscribePhase::Subscribed);
        let done = view.last_button();
        assert_eq!(done.label, SUBSCRIBED_LABEL);
        assert_eq!(done.background.as_deref(), Some("var(--color-success)"));
        assert!(view.email.borrow().is_empty());
        assert_eq!(*view.notices.borrow(), vec![SUBSCRIBED_MESSAGE.to_string()]);

        clock.advance(3000);
        assert_eq!(flow.phase(), SubscribePhase::Idle);
        assert_eq!(
            view.last_button(),
            ButtonSnapshot {
                label: "Subscribe".to_string(),
                disabled: false,
                background: None
            }
        );
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let clock = ManualScheduler::new();
        let scheduler: SharedScheduler = Rc::new(clock.clone());
        let (flow, view) = flow_with_view();

        flow.submit(&scheduler);
        flow.submit(&scheduler);
        clock.advance(10_000);
        assert_eq!(view.notices.borrow().len(), 1);
        assert_eq!(view.button.borrow().len(), 3);
    }

    #[test]
    fn test_focus_marker_only_cleared_when_empty() {
        assert!(!keeps_focus_marker(""));
        assert!(keeps_focus_marker("a"));
        assert!(keeps_focus_marker(" "));
    }

    #[test]
    fn test_border_colour_tracks_validity() {
        let (ok, bad) = ("var(--color-success)", "var(--color-primary)");
        assert_eq!(border_color(true, ok, bad), ok);
        assert_eq!(border_color(false, ok, bad), bad);
    }
}

use gloo_events::EventListener;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use crate::context::StageContext;
use crate::dom::{self, TransientNode};
use crate::error::Result;
use crate::timing::Scheduler;

pub const SPARKLE_LIFETIME_MS: u32 = 1000;
pub const PAINT_DROP_LIFETIME_MS: u32 = 1000;

/// Keyframes the transient effects and the icon wiggle refer to by name.
const KEYFRAMES: &str = r#"
@keyframes sparkle {
    0% { opacity: 0; transform: scale(0) rotate(0deg); }
    50% { opacity: 1; transform: scale(1.2) rotate(180deg); }
    100% { opacity: 0; transform: scale(0) rotate(360deg); }
}
@keyframes paintDrop {
    0% { opacity: 1; transform: scale(0); }
    20% { opacity: 1; transform: scale(1); }
    100% { opacity: 0; transform: scale(1.5) translateY(50px); }
}
@keyframes wiggle {
    0%, 100% { transform: rotate(0deg); }
    25% { transform: rotate(5deg); }
    75% { transform: rotate(-5deg); }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Sparkle,
    PaintDrop,
}

/// A decoration ready to be dropped into the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub content: Option<&'static str>,
    pub styles: Vec<(&'static str, String)>,
    pub lifetime_ms: u32,
}

impl Effect {
    /// ✨ pinned to the top-right corner of its container.
    pub fn sparkle() -> Self {
        Self {
            kind: EffectKind::Sparkle,
            content: Some("✨"),
            styles: vec![
                ("position", "absolute".to_string()),
                ("top", "10px".to_string()),
                ("right", "10px".to_string()),
                ("font-size", "1.5rem".to_string()),
                ("animation", "sparkle 1s ease-out forwards".to_string()),
                ("pointer-events", "none".to_string()),
            ],
            lifetime_ms: SPARKLE_LIFETIME_MS,
        }
    }

    /// A 6px dot fixed at viewport coordinates `(x, y)`.
    pub fn paint_drop(x: i32, y: i32, color: &str) -> Self {
        Self {
            kind: EffectKind::PaintDrop,
            content: None,
            styles: vec![
                ("position", "fixed".to_string()),
                ("left", format!("{}px", x)),
                ("top", format!("{}px", y)),
                ("width", "6px".to_string()),
                ("height", "6px".to_string()),
                ("border-radius", "50%".to_string()),
                ("background-color", color.to_string()),
                ("pointer-events", "none".to_string()),
                ("z-index", "9999".to_string()),
                ("animation", "paintDrop 1s ease-out forwards".to_string()),
            ],
            lifetime_ms: PAINT_DROP_LIFETIME_MS,
        }
    }
}

/// Applies `styles` to `node` now and detaches it once `lifetime_ms` has passed.
pub fn spawn_transient<N>(scheduler: &dyn Scheduler, node: N, styles: &[(&str, String)], lifetime_ms: u32)
where
    N: TransientNode + 'static,
{
    for (property, value) in styles {
        node.set_style(property, value);
    }
    scheduler.after(lifetime_ms, Box::new(move || node.detach()));
}

/// Creates the element for `effect`, appends it to `container` and schedules its removal.
pub fn spawn_effect(
    document: &Document,
    container: &Element,
    effect: &Effect,
    scheduler: &dyn Scheduler,
) -> Result<HtmlElement> {
    let element = dom::create_html(document, "div")?;
    if let Some(content) = effect.content {
        element.set_text_content(Some(content));
    }
    container.append_child(&element)?;
    spawn_transient(scheduler, element.clone(), &effect.styles, effect.lifetime_ms);
    Ok(element)
}

pub fn inject_keyframes(document: &Document) -> Result<()> {
    let Some(head) = document.head() else {
        debug!("No <head>; skipping keyframe injection");
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_text_content(Some(KEYFRAMES));
    head.append_child(&style)?;
    Ok(())
}

/// Lift-and-sparkle hover on feature cards.
pub fn wire_feature_cards(ctx: &StageContext) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for card in dom::query_all(&ctx.document, &ctx.config.feature_card_selector) {
        let enter = EventListener::new(&card, "mouseenter", {
            let ctx = ctx.clone();
            let card = card.clone();
            move |_| {
                dom::set_styles(
                    &card,
                    &[
                        ("transform", "translateY(-8px) scale(1.02)"),
                        ("transition", "all 0.3s ease-out"),
                        ("position", "relative"),
                    ],
                );
                let _ = spawn_effect(&ctx.document, &card, &Effect::sparkle(), ctx.scheduler.as_ref());
            }
        });
        let leave = EventListener::new(&card, "mouseleave", {
            let card = card.clone();
            move |_| dom::set_style(&card, "transform", "translateY(0) scale(1)")
        });
        listeners.push(enter);
        listeners.push(leave);
    }
    listeners
}

/// Trail of paint drops following the cursor across the hero section.
pub fn wire_paint_cursor(ctx: &StageContext) -> Option<EventListener> {
    let Some(hero) = dom::query_one(&ctx.document, &ctx.config.hero_selector) else {
        debug!("No hero section; paint cursor disabled");
        return None;
    };
    let Some(body) = ctx.document.body() else {
        return None;
    };
    let ctx = ctx.clone();
    Some(EventListener::new(&hero, "mousemove", move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let colors = &ctx.config.paint_colors;
        let Some(index) = ctx.random.borrow_mut().index(colors.len()) else {
            return;
        };
        let drop = Effect::paint_drop(mouse.client_x(), mouse.client_y(), &colors[index]);
        let _ = spawn_effect(&ctx.document, &body, &drop, ctx.scheduler.as_ref());
    }))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dom::TransientNode;

    /// Records what happens to a transient node instead of touching a DOM.
    #[derive(Clone, Default)]
    pub struct FakeNode {
        pub styles: Rc<RefCell<Vec<(String, String)>>>,
        pub attached: Rc<RefCell<bool>>,
        pub detach_calls: Rc<RefCell<u32>>,
    }

    impl FakeNode {
        pub fn attached() -> Self {
            let node = Self::default();
            *node.attached.borrow_mut() = true;
            node
        }

        pub fn is_attached(&self) -> bool {
            *self.attached.borrow()
        }

        pub fn style(&self, property: &str) -> Option<String> {
            self.styles
                .borrow()
                .iter()
                .rev()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone())
        }
    }

    impl TransientNode for FakeNode {
        fn set_style(&self, property: &str, value: &str) {
            self.styles
                .borrow_mut()
                .push((property.to_string(), value.to_string()));
        }

        fn detach(&self) {
            *self.detach_calls.borrow_mut() += 1;
            *self.attached.borrow_mut() = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeNode;
    use super::*;
    use crate::timing::ManualScheduler;

    #[test]
    fn test_transient_removed_at_lifetime() {
        let clock = ManualScheduler::new();
        let node = FakeNode::attached();
        let effect = Effect::sparkle();
        spawn_transient(&clock, node.clone(), &effect.styles, effect.lifetime_ms);

        assert_eq!(node.style("animation").as_deref(), Some("sparkle 1s ease-out forwards"));
        clock.advance(999);
        assert!(node.is_attached());
        clock.advance(1);
        assert!(!node.is_attached());
    }

    #[test]
    fn test_removal_after_manual_detach_is_harmless() {
        let clock = ManualScheduler::new();
        let node = FakeNode::attached();
        spawn_transient(&clock, node.clone(), &[], PAINT_DROP_LIFETIME_MS);
        node.detach();
        clock.advance(u64::from(PAINT_DROP_LIFETIME_MS));
        assert!(!node.is_attached());
        assert_eq!(*node.detach_calls.borrow(), 2);
    }

    #[test]
    fn test_paint_drop_positioned_at_cursor() {
        let drop = Effect::paint_drop(42, 17, "#4ECDC4");
        let style = |name: &str| {
            drop.styles
                .iter()
                .find(|(p, _)| *p == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(drop.kind, EffectKind::PaintDrop);
        assert_eq!(style("left"), Some("42px"));
        assert_eq!(style("top"), Some("17px"));
        assert_eq!(style("background-color"), Some("#4ECDC4"));
        assert_eq!(style("position"), Some("fixed"));
        assert!(drop.content.is_none());
    }
}

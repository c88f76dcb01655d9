use std::cell::Cell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use log::debug;
use web_sys::{HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::context::StageContext;
use crate::dom;

const ACTIVE: &str = "active";

/// Scroll position that leaves `target_top` just below a fixed header.
pub fn scroll_target(target_top: f64, header_height: f64, margin: f64) -> f64 {
    target_top - header_height - margin
}

fn smooth_scroll_to(ctx: &StageContext, href: &str) {
    // A bare "#" is not a valid selector and querySelector would throw.
    if href.len() < 2 {
        return;
    }
    let Some(target) = dom::query_one(&ctx.document, href) else {
        debug!("Anchor target {} not found", href);
        return;
    };
    let header_height = dom::query_one(&ctx.document, &ctx.config.header_selector)
        .map(|header| f64::from(header.offset_height()))
        .unwrap_or(0.0);
    let top = scroll_target(
        f64::from(target.offset_top()),
        header_height,
        ctx.config.scroll_margin_px,
    );

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    ctx.window.scroll_to_with_scroll_to_options(&options);
}

/// In-page anchors scroll smoothly instead of jumping.
pub fn wire_smooth_scroll(ctx: &StageContext) -> Vec<EventListener> {
    dom::query_all(&ctx.document, &ctx.config.anchor_selector)
        .into_iter()
        .map(|link| {
            let ctx = ctx.clone();
            let target = link.clone();
            EventListener::new_with_options(
                &target,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let href = link.get_attribute("href").unwrap_or_default();
                    smooth_scroll_to(&ctx, &href);
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }
}

/// Inline style for one of the three hamburger bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub transform: Option<&'static str>,
    pub opacity: Option<&'static str>,
}

pub fn bar_style(index: usize, state: MenuState) -> BarStyle {
    match (state, index) {
        (MenuState::Open, 0) => BarStyle {
            transform: Some("rotate(45deg) translateY(8px)"),
            opacity: None,
        },
        (MenuState::Open, 1) => BarStyle {
            transform: None,
            opacity: Some("0"),
        },
        (MenuState::Open, 2) => BarStyle {
            transform: Some("rotate(-45deg) translateY(-8px)"),
            opacity: None,
        },
        (MenuState::Open, _) => BarStyle {
            transform: None,
            opacity: None,
        },
        (MenuState::Closed, _) => BarStyle {
            transform: Some("none"),
            opacity: Some("1"),
        },
    }
}

/// Markup with either element marked active starts out open.
pub fn initial_menu_state(toggle_active: bool, panel_active: bool) -> MenuState {
    if toggle_active || panel_active {
        MenuState::Open
    } else {
        MenuState::Closed
    }
}

/// Whether the toggle and the panel carry the `active` class in `state`.
pub fn active_classes(state: MenuState) -> (bool, bool) {
    let open = state.is_open();
    (open, open)
}

/// Owns the open/closed state of the mobile menu; the DOM only mirrors it.
pub struct MenuController {
    state: Cell<MenuState>,
    toggle: HtmlElement,
    panel: HtmlElement,
}

impl MenuController {
    /// Takes the state from the markup and renders it straight back, so the
    /// toggle and the panel agree from the first click on.
    pub fn new(toggle: HtmlElement, panel: HtmlElement) -> Self {
        let state = initial_menu_state(
            toggle.class_list().contains(ACTIVE),
            panel.class_list().contains(ACTIVE),
        );
        let menu = Self {
            state: Cell::new(state),
            toggle,
            panel,
        };
        menu.render();
        menu
    }

    pub fn state(&self) -> MenuState {
        self.state.get()
    }

    pub fn toggle(&self) -> MenuState {
        self.set(self.state.get().toggled())
    }

    pub fn close(&self) -> MenuState {
        self.set(MenuState::Closed)
    }

    fn set(&self, state: MenuState) -> MenuState {
        self.state.set(state);
        self.render();
        state
    }

    fn render(&self) {
        let (toggle_active, panel_active) = active_classes(self.state.get());
        let _ = self.toggle.class_list().toggle_with_force(ACTIVE, toggle_active);
        let _ = self.panel.class_list().toggle_with_force(ACTIVE, panel_active);
        for (index, bar) in dom::query_all_in(&self.toggle, "span").iter().enumerate() {
            let style = bar_style(index, self.state.get());
            if let Some(transform) = style.transform {
                dom::set_style(bar, "transform", transform);
            }
            if let Some(opacity) = style.opacity {
                dom::set_style(bar, "opacity", opacity);
            }
        }
    }
}

pub fn wire_mobile_menu(ctx: &StageContext) -> Vec<EventListener> {
    let config = &ctx.config;
    let (Some(toggle), Some(panel)) = (
        dom::by_id(&ctx.document, &config.menu_toggle_id),
        dom::by_id(&ctx.document, &config.menu_panel_id),
    ) else {
        debug!("No mobile menu on this page");
        return Vec::new();
    };

    let links = dom::query_all_in(&panel, &config.nav_link_selector);
    let menu = Rc::new(MenuController::new(toggle.clone(), panel));
    let mut listeners = Vec::with_capacity(links.len() + 1);

    listeners.push(EventListener::new(&toggle, "click", {
        let menu = menu.clone();
        let scheduler = ctx.scheduler.clone();
        let first_link = links.first().cloned();
        let focus_delay = config.menu_focus_delay_ms;
        move |_| {
            if menu.toggle().is_open() {
                if let Some(link) = first_link.clone() {
                    scheduler.after(focus_delay, Box::new(move || {
                        let _ = link.focus();
                    }));
                }
            }
        }
    }));

    for link in links {
        let menu = menu.clone();
        listeners.push(EventListener::new(&link, "click", move |_| {
            menu.close();
        }));
    }
    listeners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_target_clears_header() {
        assert_eq!(scroll_target(1200.0, 80.0, 20.0), 1100.0);
        assert_eq!(scroll_target(50.0, 80.0, 20.0), -50.0);
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let start = MenuState::default();
        assert_eq!(start, MenuState::Closed);
        assert_eq!(start.toggled(), MenuState::Open);
        assert_eq!(start.toggled().toggled(), start);
        for index in 0..3 {
            assert_eq!(
                bar_style(index, start.toggled().toggled()),
                bar_style(index, start)
            );
        }
    }

    #[test]
    fn test_menu_classes_round_trip_from_markup() {
        for toggle_active in [false, true] {
            for panel_active in [false, true] {
                let start = initial_menu_state(toggle_active, panel_active);
                let (toggle_class, panel_class) = active_classes(start);
                assert_eq!(toggle_class, panel_class);
                assert_eq!(initial_menu_state(toggle_class, panel_class), start);
                assert_eq!(active_classes(start.toggled().toggled()), active_classes(start));
            }
        }
    }

    #[test]
    fn test_mismatched_markup_starts_open() {
        assert_eq!(initial_menu_state(true, false), MenuState::Open);
        assert_eq!(initial_menu_state(false, true), MenuState::Open);
        assert_eq!(initial_menu_state(false, false), MenuState::Closed);
        assert_eq!(active_classes(MenuState::Open), (true, true));
        assert_eq!(active_classes(MenuState::Closed), (false, false));
    }

    #[test]
    fn test_open_bars_form_a_cross() {
        let open = MenuState::Open;
        assert_eq!(bar_style(0, open).transform, Some("rotate(45deg) translateY(8px)"));
        assert_eq!(bar_style(1, open).opacity, Some("0"));
        assert_eq!(bar_style(1, open).transform, None);
        assert_eq!(bar_style(2, open).transform, Some("rotate(-45deg) translateY(-8px)"));
    }

    #[test]
    fn test_closed_bars_reset() {
        for index in 0..3 {
            let style = bar_style(index, MenuState::Closed);
            assert_eq!(style.transform, Some("none"));
            assert_eq!(style.opacity, Some("1"));
        }
    }
}

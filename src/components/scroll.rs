use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use js_sys::Array;
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::components::counters::{run_counter, CounterAnimation, CounterStyle};
use crate::context::StageContext;
use crate::dom;
use crate::error::Result;

/// Hidden-until-seen starting pose for reveal targets.
const REVEAL_START: &[(&str, &str)] = &[
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "all 0.6s ease-out"),
];
const REVEAL_END: &[(&str, &str)] = &[("opacity", "1"), ("transform", "translateY(0)")];

pub fn reveal_delay(batch_index: usize, stagger_ms: u32) -> u32 {
    u32::try_from(batch_index)
        .unwrap_or(u32::MAX)
        .saturating_mul(stagger_ms)
}

pub fn parallax_speed(index: usize) -> f64 {
    0.2 + index as f64 * 0.1
}

pub fn parallax_transform(scroll_y: f64, index: usize) -> String {
    // Adding 0.0 turns -0.0 into 0.0 so the top of the page renders "0px".
    let offset = -(scroll_y * parallax_speed(index)) + 0.0;
    format!("translateY({}px)", offset)
}

pub fn header_background(scroll_y: f64, max_opacity: f64) -> String {
    let opacity = (scroll_y / 100.0).min(max_opacity);
    format!("rgba(255, 255, 255, {})", opacity)
}

/// Intersection observer that reports each element the first time it comes
/// into view, then stops watching it. Disconnects when dropped.
pub struct OneShotObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl OneShotObserver {
    /// `on_sight` receives the entry's position within the observer batch and the element.
    pub fn watch<F>(elements: &[HtmlElement], threshold: f64, root_margin: &str, mut on_sight: F) -> Result<Self>
    where
        F: FnMut(usize, HtmlElement) + 'static,
    {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for (index, entry) in entries.iter().enumerate() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    if let Ok(element) = target.dyn_into::<HtmlElement>() {
                        on_sight(index, element);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        options.set_root_margin(root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for element in elements {
            observer.observe(element);
        }
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for OneShotObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Cards fade and rise into place the first time they scroll into view.
pub fn wire_reveals(ctx: &StageContext) -> Result<Option<OneShotObserver>> {
    let config = &ctx.config;
    let elements = dom::query_all(&ctx.document, &config.reveal_selector);
    if elements.is_empty() {
        return Ok(None);
    }
    for element in &elements {
        dom::set_styles(element, REVEAL_START);
    }
    let scheduler = ctx.scheduler.clone();
    let stagger = config.reveal_stagger_ms;
    let observer = OneShotObserver::watch(
        &elements,
        config.reveal_threshold,
        &config.reveal_root_margin,
        move |index, element| {
            scheduler.after(
                reveal_delay(index, stagger),
                Box::new(move || dom::set_styles(&element, REVEAL_END)),
            );
        },
    )?;
    Ok(Some(observer))
}

/// Stat and counter figures count up from zero when first seen.
pub fn wire_counters(ctx: &StageContext) -> Result<Option<OneShotObserver>> {
    let config = &ctx.config;
    let counters = dom::query_all(&ctx.document, &config.counter_selector);
    if counters.is_empty() {
        return Ok(None);
    }
    let scheduler = ctx.scheduler.clone();
    let stat_class = config.stat_counter_class.clone();
    let observer = OneShotObserver::watch(
        &counters,
        config.counter_threshold,
        &config.counter_root_margin,
        move |_, element| {
            let style = if element.class_list().contains(&stat_class) {
                CounterStyle::Stat
            } else {
                CounterStyle::Grouped
            };
            let text = element.text_content().unwrap_or_default();
            let Some(animation) = CounterAnimation::from_text(&text, style) else {
                debug!("Counter {:?} has no number to animate", text);
                return;
            };
            run_counter(&scheduler, animation, move |shown| {
                element.set_text_content(Some(shown));
            });
        },
    )?;
    Ok(Some(observer))
}

/// Parallax for decorative hero shapes plus a header that firms up as the page scrolls.
///
/// Scroll events are coalesced into at most one update per animation frame.
pub fn wire_scroll_effects(ctx: &StageContext) -> EventListener {
    let layers = Rc::new(dom::query_all(&ctx.document, &ctx.config.parallax_selector));
    let header = dom::query_one(&ctx.document, &ctx.config.header_selector);
    let max_opacity = ctx.config.header_opacity_max;
    let window = ctx.window.clone();

    let pending = Rc::new(Cell::new(false));
    let frame: Rc<RefCell<Option<AnimationFrame>>> = Rc::new(RefCell::new(None));

    EventListener::new(&ctx.window, "scroll", move |_| {
        if pending.get() {
            return;
        }
        pending.set(true);

        let pending = pending.clone();
        let window = window.clone();
        let layers = layers.clone();
        let header = header.clone();
        let handle = request_animation_frame(move |_| {
            pending.set(false);
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            for (index, layer) in layers.iter().enumerate() {
                dom::set_style(layer, "transform", &parallax_transform(scroll_y, index));
            }
            if let Some(header) = &header {
                dom::set_style(header, "background-color", &header_background(scroll_y, max_opacity));
            }
        });
        // Replacing the slot drops the previous, already-fired frame.
        *frame.borrow_mut() = Some(handle);
    })
}

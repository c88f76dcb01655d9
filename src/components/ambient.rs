use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::components::counters::SmilesCounter;
use crate::context::StageContext;
use crate::dom::{self, TransientNode};
use crate::timing::{RandomSource, Scheduler};

pub const PULSE_MS: u32 = 200;
pub const WIGGLE_MS: u32 = 500;
const WIGGLE_ANIMATION: &str = "wiggle 0.5s ease-in-out";

/// Scale pulse on `node`: grow now, settle back after [`PULSE_MS`].
pub fn pulse<N>(scheduler: &dyn Scheduler, node: N)
where
    N: TransientNode + 'static,
{
    node.set_style("transform", "scale(1.1)");
    scheduler.after(PULSE_MS, Box::new(move || node.set_style("transform", "scale(1)")));
}

/// Wiggles one icon picked uniformly from `icons` and returns its index.
/// An empty set is left alone.
pub fn wiggle_one<N>(icons: Vec<N>, random: &mut dyn RandomSource, scheduler: &dyn Scheduler) -> Option<usize>
where
    N: TransientNode + 'static,
{
    let index = random.index(icons.len())?;
    let icon = icons.into_iter().nth(index)?;
    icon.set_style("animation", WIGGLE_ANIMATION);
    // Clearing the property lets the same icon wiggle again on a later tick.
    scheduler.after(WIGGLE_MS, Box::new(move || icon.set_style("animation", "")));
    Some(index)
}

/// Starts the smiles ticker. Its period is drawn once, uniformly in the configured range.
pub fn start_smiles_ticker(ctx: &StageContext) {
    let config = &ctx.config;
    let Some(display) = dom::by_id(&ctx.document, &config.smile_counter_id) else {
        debug!("No smiles counter on this page");
        return;
    };
    let period = ctx
        .random
        .borrow_mut()
        .between(config.smiles_min_period_ms, config.smiles_max_period_ms);
    info!("Smiles ticker every {}ms", period);

    let counter = Rc::new(RefCell::new(SmilesCounter::new(config.smiles_start)));
    let random = ctx.random.clone();
    let scheduler = ctx.scheduler.clone();
    ctx.scheduler.every(
        period,
        Box::new(move || {
            let text = {
                let mut counter = counter.borrow_mut();
                counter.bump(&mut *random.borrow_mut());
                counter.display()
            };
            display.set_text_content(Some(&text));
            pulse(scheduler.as_ref(), display.clone());
        }),
    );
}

/// Every few seconds one decorative icon does a little wiggle.
pub fn start_icon_wiggle(ctx: &StageContext) {
    let document = ctx.document.clone();
    let selector = ctx.config.icon_selector.clone();
    let random = ctx.random.clone();
    let scheduler = ctx.scheduler.clone();
    ctx.scheduler.every(
        ctx.config.wiggle_period_ms,
        Box::new(move || {
            let icons = dom::query_all(&document, &selector);
            wiggle_one(icons, &mut *random.borrow_mut(), scheduler.as_ref());
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::FakeNode;
    use crate::timing::testing::Scripted;
    use crate::timing::ManualScheduler;

    #[test]
    fn test_wiggle_with_no_icons_does_nothing() {
        let clock = ManualScheduler::new();
        let mut random = Scripted::new(&[0.3]);
        let picked = wiggle_one(Vec::<FakeNode>::new(), &mut random, &clock);
        assert_eq!(picked, None);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_wiggle_animates_then_clears() {
        let clock = ManualScheduler::new();
        let icons = vec![FakeNode::attached(), FakeNode::attached(), FakeNode::attached()];
        let mut random = Scripted::new(&[0.5]);
        let picked = wiggle_one(icons.clone(), &mut random, &clock);
        assert_eq!(picked, Some(1));
        assert_eq!(icons[1].style("animation").as_deref(), Some(WIGGLE_ANIMATION));
        assert_eq!(icons[0].style("animation"), None);

        clock.advance(u64::from(WIGGLE_MS));
        assert_eq!(icons[1].style("animation").as_deref(), Some(""));
    }

    #[test]
    fn test_pulse_returns_to_rest() {
        let clock = ManualScheduler::new();
        let node = FakeNode::attached();
        pulse(&clock, node.clone());
        assert_eq!(node.style("transform").as_deref(), Some("scale(1.1)"));
        clock.advance(u64::from(PULSE_MS));
        assert_eq!(node.style("transform").as_deref(), Some("scale(1)"));
    }
}

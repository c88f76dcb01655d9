use std::rc::Rc;

use web_sys::{Document, Window};

use crate::config::Config;
use crate::timing::{SharedRandom, SharedScheduler};

/// Everything a feature needs to wire itself onto the page.
#[derive(Clone)]
pub struct StageContext {
    pub window: Window,
    pub document: Document,
    pub config: Rc<Config>,
    pub scheduler: SharedScheduler,
    pub random: SharedRandom,
}

impl StageContext {
    pub fn new(
        window: Window,
        document: Document,
        config: Config,
        scheduler: SharedScheduler,
        random: SharedRandom,
    ) -> Self {
        Self {
            window,
            document,
            config: Rc::new(config),
            scheduler,
            random,
        }
    }
}

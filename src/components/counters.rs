use std::rc::Rc;

use crate::timing::{RandomSource, SharedScheduler};

pub const COUNT_UP_DURATION_MS: u32 = 2000;
pub const FRAME_MS: u32 = 16;

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// The number shown in a counter, ignoring separators and suffixes.
/// `"1,500+"` reads as 1500. Text without digits has no value.
pub fn displayed_value(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    /// Headline stats render as `500+`.
    Stat,
    /// Everything else gets thousands separators.
    Grouped,
}

impl CounterStyle {
    pub fn format(self, value: u64) -> String {
        match self {
            CounterStyle::Stat => format!("{}+", value),
            CounterStyle::Grouped => group_thousands(value),
        }
    }
}

/// Count-up from zero to the counter's original value over roughly two seconds.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    step: f64,
    current: f64,
    style: CounterStyle,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: u64, style: CounterStyle) -> Self {
        let frames = f64::from(COUNT_UP_DURATION_MS) / f64::from(FRAME_MS);
        Self {
            target,
            step: target as f64 / frames,
            current: 0.0,
            style,
            finished: false,
        }
    }

    pub fn from_text(text: &str, style: CounterStyle) -> Option<Self> {
        displayed_value(text).map(|target| Self::new(target, style))
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances one frame and returns the text to display.
    pub fn tick(&mut self) -> String {
        if !self.finished {
            self.current += self.step;
            if self.current >= self.target as f64 {
                self.current = self.target as f64;
                self.finished = true;
            }
        }
        if self.finished {
            // `target as f64` rounds above 2^53; the last frame shows the exact integer.
            return self.style.format(self.target);
        }
        let shown = (self.current.floor() as u64).min(self.target);
        self.style.format(shown)
    }
}

/// Drives `animation` one frame every [`FRAME_MS`] until it lands on its target.
pub fn run_counter<F>(scheduler: &SharedScheduler, animation: CounterAnimation, render: F)
where
    F: Fn(&str) + 'static,
{
    schedule_frame(scheduler.clone(), animation, Rc::new(render));
}

fn schedule_frame(scheduler: SharedScheduler, mut animation: CounterAnimation, render: Rc<dyn Fn(&str)>) {
    let next = scheduler.clone();
    scheduler.after(
        FRAME_MS,
        Box::new(move || {
            let text = animation.tick();
            render(&text);
            if !animation.is_finished() {
                schedule_frame(next, animation, render);
            }
        }),
    );
}

/// The ever-growing "smiles created" figure in the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmilesCounter {
    count: u64,
}

impl SmilesCounter {
    pub fn new(start: u64) -> Self {
        Self { count: start }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adds between one and three smiles.
    pub fn bump(&mut self, random: &mut dyn RandomSource) -> u64 {
        let extra = random.index(3).unwrap_or(0) as u64 + 1;
        self.count += extra;
        self.count
    }

    pub fn display(&self) -> String {
        group_thousands(self.count)
    }
}

use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional `<script type="application/json">` block that overrides defaults.
pub const CONFIG_ELEMENT_ID: &str = "stage-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Chatty while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Performance diagnostics only run on these hosts.
pub fn is_dev_host(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1")
}

/// Selectors, design tokens and timings the interaction layer relies on.
///
/// Every field has a default matching the stock page markup, so a page only
/// has to list the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub header_selector: String,
    pub anchor_selector: String,
    pub scroll_margin_px: f64,

    pub menu_toggle_id: String,
    pub menu_panel_id: String,
    pub nav_link_selector: String,
    pub menu_focus_delay_ms: u32,

    pub reveal_selector: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_stagger_ms: u32,

    pub counter_selector: String,
    pub stat_counter_class: String,
    pub counter_threshold: f64,
    pub counter_root_margin: String,

    pub parallax_selector: String,
    pub header_opacity_max: f64,

    pub feature_card_selector: String,
    pub hero_selector: String,
    pub paint_colors: Vec<String>,

    pub newsletter_form_selector: String,
    pub success_color: String,
    pub alert_color: String,
    pub subscribe_latency_ms: u32,
    pub subscribe_reset_ms: u32,

    pub smile_counter_id: String,
    pub smiles_start: u64,
    pub smiles_min_period_ms: u32,
    pub smiles_max_period_ms: u32,

    pub icon_selector: String,
    pub wiggle_period_ms: u32,

    pub announcement_id: String,
    pub toast_visible_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_selector: ".header".to_string(),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            scroll_margin_px: 20.0,

            menu_toggle_id: "mobileMenuToggle".to_string(),
            menu_panel_id: "navMenu".to_string(),
            nav_link_selector: ".nav-link".to_string(),
            menu_focus_delay_ms: 100,

            reveal_selector:
                ".value-card, .program-card, .feature-card, .testimonial-card, .safety-item"
                    .to_string(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_stagger_ms: 100,

            counter_selector: ".stat-number, .counter-number".to_string(),
            stat_counter_class: "stat-number".to_string(),
            counter_threshold: 0.5,
            counter_root_margin: "0px 0px -100px 0px".to_string(),

            parallax_selector: ".splash, .supply".to_string(),
            header_opacity_max: 0.95,

            feature_card_selector: ".feature-card".to_string(),
            hero_selector: ".hero".to_string(),
            paint_colors: ["#FF6B6B", "#4ECDC4", "#FFE66D", "#FF9FF3", "#54A0FF"]
                .iter()
                .map(|c| c.to_string())
                .collect(),

            newsletter_form_selector: ".newsletter-form".to_string(),
            success_color: "var(--color-success)".to_string(),
            alert_color: "var(--color-primary)".to_string(),
            subscribe_latency_ms: 1500,
            subscribe_reset_ms: 3000,

            smile_counter_id: "smileCounter".to_string(),
            smiles_start: 1247,
            smiles_min_period_ms: 3000,
            smiles_max_period_ms: 8000,

            icon_selector: ".program-icon, .feature-icon, .value-icon".to_string(),
            wiggle_period_ms: 8000,

            announcement_id: "announcementBar".to_string(),
            toast_visible_ms: 5000,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        Ok(config)
    }

    /// Reads the inline config block. A page without one gets the defaults.
    pub fn load(document: &Document) -> Result<Self> {
        let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Ok(Config::default());
        };
        let raw = element.text_content().unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }
        Config::from_json(&raw)
    }
}

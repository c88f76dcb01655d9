use log::debug;

use crate::context::StageContext;
use crate::dom::{self, TransientNode};
use crate::error::{InteractionError, Result};
use crate::timing::{RandomSource, SharedScheduler};

pub const SLIDE_IN_DELAY_MS: u32 = 100;
pub const SLIDE_OUT_MS: u32 = 300;

const HIDDEN: &str = "translateX(100%)";
const SHOWN: &str = "translateX(0)";

const TOAST_STYLES: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "120px"),
    ("right", "20px"),
    ("background", "var(--color-success)"),
    ("color", "var(--color-text)"),
    ("padding", "var(--spacing-md)"),
    ("border-radius", "var(--radius-lg)"),
    ("box-shadow", "var(--shadow-lg)"),
    ("z-index", "10000"),
    ("max-width", "300px"),
    ("font-size", "var(--font-size-small)"),
    ("font-weight", "600"),
    ("transform", HIDDEN),
    ("transition", "transform 0.3s ease-out"),
];

const ART_PROJECTS: [&str; 8] = [
    "Rainbow Handprint Tree",
    "Paper Plate Animals",
    "Coffee Filter Flowers",
    "Rock Painting Adventure",
    "Tissue Paper Butterflies",
    "Egg Carton Creatures",
    "Painted Pasta Necklaces",
    "Cardboard Castle Building",
];

pub const SUBSCRIBED_MESSAGE: &str =
    "🎨 Welcome to our creative family! Check your email for free art activities.";

/// Placeholder buttons for features that do not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComingSoon {
    VirtualTour,
    ArtGenerator,
    ColorMixer,
    ArtGallery,
}

impl ComingSoon {
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "virtual-tour" => Some(ComingSoon::VirtualTour),
            "art-generator" => Some(ComingSoon::ArtGenerator),
            "color-mixer" => Some(ComingSoon::ColorMixer),
            "art-gallery" => Some(ComingSoon::ArtGallery),
            _ => None,
        }
    }

    pub fn message(self, random: &mut dyn RandomSource) -> String {
        match self {
            ComingSoon::VirtualTour => {
                "🏠 Virtual tour feature coming soon! Take a peek at our magical studios.".to_string()
            }
            ComingSoon::ArtGenerator => {
                let index = random.index(ART_PROJECTS.len()).unwrap_or(0);
                format!(
                    "🎯 Today's Art Adventure: {}! Perfect for little hands.",
                    ART_PROJECTS[index]
                )
            }
            ComingSoon::ColorMixer => {
                "🎨 Color Mixer Game launching soon! Learn about primary and secondary colors through play."
                    .to_string()
            }
            ComingSoon::ArtGallery => {
                "🖼️ Student Art Gallery opening soon! See amazing masterpieces from our little artists."
                    .to_string()
            }
        }
    }
}

/// Slide in, hold, slide out, then detach. Total on-screen time is
/// `visible_ms` plus the slide-out transition.
pub fn run_toast<N>(scheduler: &SharedScheduler, node: N, visible_ms: u32)
where
    N: TransientNode + Clone + 'static,
{
    let entering = node.clone();
    scheduler.after(
        SLIDE_IN_DELAY_MS,
        Box::new(move || entering.set_style("transform", SHOWN)),
    );

    let leaving_scheduler = scheduler.clone();
    scheduler.after(
        visible_ms,
        Box::new(move || {
            node.set_style("transform", HIDDEN);
            leaving_scheduler.after(SLIDE_OUT_MS, Box::new(move || node.detach()));
        }),
    );
}

/// Shows `message` as a toast in the top-right corner.
///
/// Toasts are not queued: two shown back to back overlap.
pub fn show_notification(ctx: &StageContext, message: &str) -> Result<()> {
    let body = ctx.document.body().ok_or(InteractionError::NoBody)?;
    let toast = dom::create_html(&ctx.document, "div")?;
    toast.set_text_content(Some(message));
    dom::set_styles(&toast, TOAST_STYLES);
    body.append_child(&toast)?;
    debug!("Toast shown: {}", message);
    run_toast(&ctx.scheduler, toast, ctx.config.toast_visible_ms);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::FakeNode;
    use crate::timing::testing::Scripted;
    use crate::timing::ManualScheduler;
    use std::rc::Rc;

    #[test]
    fn test_toast_lifecycle() {
        let clock = ManualScheduler::new();
        let scheduler: SharedScheduler = Rc::new(clock.clone());
        let node = FakeNode::attached();
        node.set_style("transform", HIDDEN);

        run_toast(&scheduler, node.clone(), 5000);

        clock.advance(99);
        assert_eq!(node.style("transform").as_deref(), Some(HIDDEN));
        clock.advance(1);
        assert_eq!(node.style("transform").as_deref(), Some(SHOWN));

        clock.advance(4900);
        assert_eq!(node.style("transform").as_deref(), Some(HIDDEN));
        assert!(node.is_attached());

        clock.advance(u64::from(SLIDE_OUT_MS));
        assert!(!node.is_attached());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_toast_tolerates_early_removal() {
        let clock = ManualScheduler::new();
        let scheduler: SharedScheduler = Rc::new(clock.clone());
        let node = FakeNode::attached();
        run_toast(&scheduler, node.clone(), 5000);
        node.detach();
        clock.advance(6000);
        assert!(!node.is_attached());
    }

    #[test]
    fn test_coming_soon_actions() {
        assert_eq!(ComingSoon::from_action("virtual-tour"), Some(ComingSoon::VirtualTour));
        assert_eq!(ComingSoon::from_action("art-gallery"), Some(ComingSoon::ArtGallery));
        assert_eq!(ComingSoon::from_action("teleport"), None);
    }

    #[test]
    fn test_art_generator_picks_listed_project() {
        let mut random = Scripted::new(&[0.0, 0.99, 0.4]);
        let first = ComingSoon::ArtGenerator.message(&mut random);
        let last = ComingSoon::ArtGenerator.message(&mut random);
        let middle = ComingSoon::ArtGenerator.message(&mut random);
        assert_eq!(
            first,
            "🎯 Today's Art Adventure: Rainbow Handprint Tree! Perfect for little hands."
        );
        assert!(last.contains("Cardboard Castle Building"));
        assert!(middle.contains("Rock Painting Adventure"));
    }

    #[test]
    fn test_fixed_messages_ignore_randomness() {
        let mut random = Scripted::new(&[0.7]);
        assert!(ComingSoon::ColorMixer
            .message(&mut random)
            .starts_with("🎨 Color Mixer Game"));
    }
}

use serde::{Deserialize, Serialize};

/// A generation prompt and the file its image is saved as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptItem {
    pub filename: String,
    pub prompt: String,
}

impl PromptItem {
    pub fn new<F: Into<String>, P: Into<String>>(filename: F, prompt: P) -> Self {
        Self {
            filename: filename.into(),
            prompt: prompt.into(),
        }
    }
}

/// The marketing illustration set. Worded to stay clear of content-policy refusals:
/// no people, abstract or iconographic scenes.
pub fn default_prompts() -> Vec<PromptItem> {
    vec![
        PromptItem::new(
            "01-gamification-concept.png",
            "Modern flat design digital illustration showing gamification concept for household tasks. \
             Colorful icons of stars, badges, level indicators and achievement symbols. Purple and gold \
             color scheme. Clean vector style marketing graphic. No people, abstract design.",
        ),
        PromptItem::new(
            "02-app-mockup.png",
            "Smartphone floating on purple gradient background displaying a colorful leaderboard interface \
             with circular avatar placeholders and score bars. Confetti and star decorations around the \
             device. Modern tech product marketing illustration. Clean minimal design.",
        ),
        PromptItem::new(
            "03-teamwork-icons.png",
            "Cheerful flat design illustration showing household activity icons: broom, dishes, laundry \
             basket arranged in a playful pattern. Bright warm colors with purple and gold accents. Family \
             friendly vector graphics for app marketing.",
        ),
        PromptItem::new(
            "04-rewards-system.png",
            "Abstract flat design illustration of achievement and reward concept. Star icons, trophy \
             symbols, gift box icons, and medal badges arranged artistically. Purple, indigo and gold color \
             palette. Clean vector marketing graphic.",
        ),
        PromptItem::new(
            "05-happy-home.png",
            "Cozy modern living room interior illustration in warm flat design style. Clean organized space \
             with houseplants, comfortable sofa, warm golden lighting from window. Peaceful domestic scene, \
             no people visible.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = default_prompts();
        assert_eq!(prompts.len(), 5);
        assert!(prompts.iter().all(|p| p.filename.ends_with(".png")));
        assert!(prompts[0].prompt.contains("Purple and gold color scheme."));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// The per-image inputs of an overlay; everything else lives in [`OverlayLayout`](super::OverlayLayout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub headline: String,
    pub subtitle: String,

    /// Logo to paste; a path that does not resolve is skipped
    pub logo: Option<PathBuf>,
}

impl OverlaySpec {
    pub fn new<H: Into<String>, S: Into<String>>(headline: H, subtitle: S) -> Self {
        Self {
            headline: headline.into(),
            subtitle: subtitle.into(),
            logo: None,
        }
    }

    pub fn with_logo<P: Into<PathBuf>>(mut self, logo: P) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// A named marketing image: where it comes from, where it goes, what it says
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub headline: String,
    pub subtitle: String,

    /// Source image, relative to the marketing directory
    pub source: PathBuf,

    /// Output image, relative to the marketing directory
    pub output: PathBuf,

    /// Logo override for this variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
}

impl Variant {
    fn builtin(name: &str, headline: &str, subtitle: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            headline: headline.to_string(),
            subtitle: subtitle.to_string(),
            source: PathBuf::from(source),
            output: PathBuf::from(format!("dailybag_{name}_branded.png")),
            logo: None,
        }
    }

    /// The overlay inputs for this variant, falling back to `default_logo`.
    pub fn overlay_spec(&self, default_logo: Option<&Path>) -> OverlaySpec {
        OverlaySpec {
            headline: self.headline.clone(),
            subtitle: self.subtitle.clone(),
            logo: self.logo.clone().or_else(|| default_logo.map(Path::to_path_buf)),
        }
    }
}

/// Ordered collection of overlay variants.
///
/// Built-in variants are registered first; registering a variant with an
/// existing name replaces it in place.
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    variants: Vec<Variant>,
}

impl VariantRegistry {
    /// Create a registry holding the four built-in marketing variants
    pub fn new() -> Self {
        let mut registry = Self { variants: Vec::new() };
        registry.register_builtin_variants();
        registry
    }

    pub fn empty() -> Self {
        Self { variants: Vec::new() }
    }

    fn register_builtin_variants(&mut self) {
        self.register(Variant::builtin(
            "leaderboard",
            "COMPETE WITH YOUR FAMILY",
            "Household leaderboards  •  Real rewards",
            "dailybag_leaderboard_00002_.png",
        ));
        self.register(Variant::builtin(
            "achievement",
            "LEVEL UP YOUR LIFE",
            "Earn XP  •  Unlock achievements  •  Celebrate wins",
            "dailybag_achievement_00001_.png",
        ));
        self.register(Variant::builtin(
            "rewards",
            "TURN CHORES INTO CASH",
            "100 points = $1  •  Real money redemptions",
            "dailybag_rewards_00001_.png",
        ));
        self.register(Variant::builtin(
            "family",
            "CHORES MADE FUN",
            "Gamified tasks for the whole family",
            "dailybag_family_00001_.png",
        ));
    }

    /// Register a variant, replacing any existing one with the same name
    pub fn register(&mut self, variant: Variant) {
        match self.variants.iter_mut().find(|v| v.name == variant.name) {
            Some(existing) => *existing = variant,
            None => self.variants.push(variant),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Like [`get`](Self::get), but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<&Variant> {
        self.get(name).ok_or_else(|| {
            ConfigError::UnknownVariant {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// A registry holding only the named variants, in the order given
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut selected = Self::empty();
        for name in names {
            selected.register(self.require(name.as_ref())?.clone());
        }
        Ok(selected)
    }

    /// Variant names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

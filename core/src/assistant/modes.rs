//! Interaction modes and the model each one resolves to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const FAST_MODEL: &str = "gemini-2.5-flash-lite";
pub const STANDARD_MODEL: &str = "gemini-2.5-flash";
pub const DEEP_THOUGHT_MODEL: &str = "gemini-2.5-pro";

/// Model used for grounded search queries.
pub const GROUNDED_MODEL: &str = "gemini-2.5-flash";

/// Reasoning allowance granted to [`InteractionMode::DeepThought`].
pub const DEEP_THOUGHT_BUDGET: u32 = 32_768;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionMode {
    Fast,
    #[default]
    Standard,
    DeepThought,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 3] = [Self::Fast, Self::Standard, Self::DeepThought];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Standard => "Standard",
            Self::DeepThought => "Deep Thought",
        }
    }

    /// Parse a mode label, falling back to `Standard` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalised.as_str() {
            "fast" => Ok(Self::Fast),
            "standard" => Ok(Self::Standard),
            "deepthought" => Ok(Self::DeepThought),
            _ => Err(format!("unknown interaction mode: {s}")),
        }
    }
}

/// Per-call generation settings. An empty config serialises to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationConfig {
    pub thinking_budget: Option<u32>,
}

impl InvocationConfig {
    pub fn is_empty(&self) -> bool {
        self.thinking_budget.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelection {
    pub model: &'static str,
    pub config: InvocationConfig,
}

pub fn select_model(mode: InteractionMode) -> ModelSelection {
    match mode {
        InteractionMode::Fast => ModelSelection {
            model: FAST_MODEL,
            config: InvocationConfig::default(),
        },
        InteractionMode::Standard => ModelSelection {
            model: STANDARD_MODEL,
            config: InvocationConfig::default(),
        },
        InteractionMode::DeepThought => ModelSelection {
            model: DEEP_THOUGHT_MODEL,
            config: InvocationConfig {
                thinking_budget: Some(DEEP_THOUGHT_BUDGET),
            },
        },
    }
}

/// Tier for stateless one-off generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTier {
    #[default]
    Fast,
    HighCapability,
}

impl ContentTier {
    pub fn model(&self) -> &'static str {
        match self {
            Self::Fast => "gemini-2.5-flash",
            Self::HighCapability => "gemini-2.5-pro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_mode_maps_to_a_distinct_model() {
        let models: HashSet<_> = InteractionMode::ALL
            .iter()
            .map(|m| select_model(*m).model)
            .collect();
        assert_eq!(models.len(), 3);
    }

    #[test]
    fn only_deep_thought_carries_a_budget() {
        assert!(select_model(InteractionMode::Fast).config.is_empty());
        assert!(select_model(InteractionMode::Standard).config.is_empty());
        let deep = select_model(InteractionMode::DeepThought);
        assert_eq!(deep.model, "gemini-2.5-pro");
        assert_eq!(deep.config.thinking_budget, Some(32768));
    }

    #[test]
    fn selection_is_deterministic() {
        for mode in InteractionMode::ALL {
            assert_eq!(select_model(mode), select_model(mode));
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_standard() {
        assert_eq!(InteractionMode::from_label("Deep Thought"), InteractionMode::DeepThought);
        assert_eq!(InteractionMode::from_label("deep-thought"), InteractionMode::DeepThought);
        assert_eq!(InteractionMode::from_label("FAST"), InteractionMode::Fast);
        assert_eq!(InteractionMode::from_label("turbo"), InteractionMode::Standard);
        assert_eq!(
            select_model(InteractionMode::from_label("")),
            select_model(InteractionMode::Standard)
        );
    }

    #[test]
    fn labels_round_trip() {
        for mode in InteractionMode::ALL {
            assert_eq!(InteractionMode::from_label(&mode.to_string()), mode);
        }
    }
}

//! Load-strategy selection
//!
//! Maps a source size and the caller's intent to a decode strategy. The
//! selection is a pure function of its inputs.

use lumen_config::StrategyConfig;
use lumen_core::{Error, Result, TargetSize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Divisor applied to each side of the viewport for a progressive first pass
pub const PROGRESSIVE_PREVIEW_DIVISOR: u32 = 4;

/// How the decoder should load an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Single-shot full decode
    Fast,
    /// Reduced first pass shown immediately, full decode afterwards
    Progressive,
    /// Capped preview resolution only
    Preview,
    /// Decoder chooses, bounded by the viewport
    Auto,
}

/// What the caller wants the decoded item for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadIntent {
    Display,
    Preview,
}

/// Pick the strategy for a source of `size_mb`
pub fn select_strategy(size_mb: f64, intent: LoadIntent, config: &StrategyConfig) -> LoadStrategy {
    if size_mb <= config.fast_threshold_mb {
        LoadStrategy::Fast
    } else if config.progressive_enabled && size_mb >= config.progressive_threshold_mb {
        LoadStrategy::Progressive
    } else if intent == LoadIntent::Preview {
        LoadStrategy::Preview
    } else {
        LoadStrategy::Auto
    }
}

impl LoadStrategy {
    pub const ALL: [LoadStrategy; 4] = [Self::Fast, Self::Progressive, Self::Preview, Self::Auto];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Progressive => "progressive",
            Self::Preview => "preview",
            Self::Auto => "auto",
        }
    }

    /// Foreground retry order: this strategy, then the generic decode
    pub fn fallback_chain(self) -> Vec<LoadStrategy> {
        let mut chain = vec![self];
        if self != Self::Auto {
            chain.push(Self::Auto);
        }
        chain
    }

    /// Decode size to request for this strategy
    ///
    /// `viewport` of `None` means native resolution; reduced strategies then
    /// fall back to a square bounded by the preview dimension.
    pub fn target_for(
        self,
        viewport: Option<TargetSize>,
        config: &StrategyConfig,
    ) -> Option<TargetSize> {
        let preview_box = || {
            TargetSize::new(config.preview_max_dimension, config.preview_max_dimension)
        };
        match self {
            Self::Fast | Self::Auto => viewport,
            Self::Progressive => Some(
                viewport
                    .map(|size| size.scaled_down(PROGRESSIVE_PREVIEW_DIVISOR))
                    .unwrap_or_else(preview_box),
            ),
            Self::Preview => Some(
                viewport
                    .map(|size| size.capped(config.preview_max_dimension))
                    .unwrap_or_else(preview_box),
            ),
        }
    }

    /// Whether the strategy displays a reduced first pass before the full image
    pub const fn is_staged(self) -> bool {
        matches!(self, Self::Progressive)
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "progressive" => Ok(Self::Progressive),
            "preview" => Ok(Self::Preview),
            "auto" => Ok(Self::Auto),
            other => Err(Error::configuration_with_default(
                format!("unknown load strategy '{other}'"),
                "auto",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_select_strategies() {
        let config = StrategyConfig::default();
        assert_eq!(select_strategy(1.0, LoadIntent::Display, &config), LoadStrategy::Fast);
        assert_eq!(select_strategy(2.0, LoadIntent::Display, &config), LoadStrategy::Fast);
        assert_eq!(select_strategy(5.0, LoadIntent::Display, &config), LoadStrategy::Auto);
        assert_eq!(select_strategy(5.0, LoadIntent::Preview, &config), LoadStrategy::Preview);
        assert_eq!(
            select_strategy(15.0, LoadIntent::Display, &config),
            LoadStrategy::Progressive
        );
        assert_eq!(
            select_strategy(40.0, LoadIntent::Preview, &config),
            LoadStrategy::Progressive
        );
    }

    #[test]
    fn disabled_progressive_falls_through() {
        let config = StrategyConfig {
            progressive_enabled: false,
            ..Default::default()
        };
        assert_eq!(select_strategy(40.0, LoadIntent::Display, &config), LoadStrategy::Auto);
        assert_eq!(select_strategy(40.0, LoadIntent::Preview, &config), LoadStrategy::Preview);
        assert_eq!(select_strategy(0.5, LoadIntent::Preview, &config), LoadStrategy::Fast);
    }

    #[test]
    fn fallback_chains_end_in_auto() {
        assert_eq!(
            LoadStrategy::Progressive.fallback_chain(),
            vec![LoadStrategy::Progressive, LoadStrategy::Auto]
        );
        assert_eq!(LoadStrategy::Auto.fallback_chain(), vec![LoadStrategy::Auto]);
    }

    #[test]
    fn targets_follow_strategy() {
        let config = StrategyConfig::default();
        let viewport = Some(TargetSize::new(3840, 2160));

        assert_eq!(LoadStrategy::Fast.target_for(viewport, &config), viewport);
        assert_eq!(LoadStrategy::Auto.target_for(None, &config), None);
        assert_eq!(
            LoadStrategy::Progressive.target_for(viewport, &config),
            Some(TargetSize::new(960, 540))
        );
        assert_eq!(
            LoadStrategy::Preview.target_for(viewport, &config),
            Some(TargetSize::new(1024, 576))
        );
        assert_eq!(
            LoadStrategy::Preview.target_for(None, &config),
            Some(TargetSize::new(1024, 1024))
        );
    }

    #[test]
    fn names_parse() {
        for strategy in LoadStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<LoadStrategy>().unwrap(), strategy);
        }
        assert!("turbo".parse::<LoadStrategy>().is_err());
    }
}

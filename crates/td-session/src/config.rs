//! Session configuration (JSON or YAML)

use std::path::Path;

use serde::{Deserialize, Serialize};

use td_core::{TdError, TdResult};
use td_pool::RangeSpec;
use td_reveal::{RevealTiming, TimingProfile};

/// Everything needed to build a [`crate::DrawSession`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Named timing profile
    pub profile: TimingProfile,

    /// Explicit timing, overrides `profile` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<RevealTiming>,

    /// Seed for selection and display cycling (reproducible draws)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Sold ranges
    pub ranges: RangeSpec,
}

impl SessionConfig {
    pub fn with_ranges(mut self, ranges: RangeSpec) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_profile(mut self, profile: TimingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Effective reveal timing
    pub fn reveal_timing(&self) -> RevealTiming {
        let timing = match self.timing {
            Some(timing) => timing,
            None => {
                if self.profile == TimingProfile::Custom {
                    log::warn!("Custom timing profile without timing values, using normal speed");
                }
                RevealTiming::from_profile(self.profile)
            }
        };
        timing.sanitized()
    }

    /// Reject settings that deserialize but cannot mean what they say
    pub fn validate(&self) -> TdResult<()> {
        if self.profile == TimingProfile::Custom && self.timing.is_none() {
            return Err(TdError::Config(
                "profile 'custom' requires a timing block".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> TdResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TdError::Config(format!("JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> TdResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| TdError::Config(format!("YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> TdResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TdError::Config(e.to_string()))
    }

    /// Load from file; `.yaml`/`.yml` is read as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> TdResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };
        log::debug!("Loaded session config from {}", path.display());
        Ok(config)
    }
}

//! Timing profiles for the reveal sequence

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing profile for the reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal presentation speed
    #[default]
    Normal,
    /// Fast mode (half the durations)
    Turbo,
    /// Hand-tuned values
    Custom,
}

impl TimingProfile {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Turbo => "Turbo",
            Self::Custom => "Custom",
        }
    }
}

fn custom_profile() -> TimingProfile {
    TimingProfile::Custom
}

/// Detailed reveal timing (all values in milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Profile type
    #[serde(default = "custom_profile")]
    pub profile: TimingProfile,

    /// Number/variant cycling period
    pub number_interval_ms: u64,

    /// Delay before color cycling begins, so the first color is visible
    pub color_start_delay_ms: u64,

    /// Color cycling period
    pub color_interval_ms: u64,

    /// Cycling phase length, measured from start
    pub cycle_duration_ms: u64,

    /// Frozen overlay shown before the reveal
    pub settle_delay_ms: u64,

    /// Overlay fade-out after the reveal
    pub fade_out_ms: u64,
}

impl RevealTiming {
    /// Normal presentation timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            number_interval_ms: 70,
            color_start_delay_ms: 50,
            color_interval_ms: 900,
            cycle_duration_ms: 2000,
            settle_delay_ms: 100,
            fade_out_ms: 600,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            ..Self::normal().scaled(0.5)
        }
    }

    /// Get timing for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale every duration by factor (< 1.0 = faster), never below 1ms
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| ((ms as f64 * factor).round() as u64).max(1);
        Self {
            profile: TimingProfile::Custom,
            number_interval_ms: scale(self.number_interval_ms),
            color_start_delay_ms: scale(self.color_start_delay_ms),
            color_interval_ms: scale(self.color_interval_ms),
            cycle_duration_ms: scale(self.cycle_duration_ms),
            settle_delay_ms: scale(self.settle_delay_ms),
            fade_out_ms: scale(self.fade_out_ms),
        }
    }

    /// Clamp every duration to at least 1ms (periodic timers reject zero)
    pub fn sanitized(&self) -> Self {
        Self {
            profile: self.profile,
            number_interval_ms: self.number_interval_ms.max(1),
            color_start_delay_ms: self.color_start_delay_ms.max(1),
            color_interval_ms: self.color_interval_ms.max(1),
            cycle_duration_ms: self.cycle_duration_ms.max(1),
            settle_delay_ms: self.settle_delay_ms.max(1),
            fade_out_ms: self.fade_out_ms.max(1),
        }
    }

    /// Start → terminal reveal event
    pub fn reveal_latency_ms(&self) -> u64 {
        self.cycle_duration_ms + self.settle_delay_ms
    }

    /// Start → overlay cleared
    pub fn total_duration_ms(&self) -> u64 {
        self.reveal_latency_ms() + self.fade_out_ms
    }

    pub(crate) fn number_interval(&self) -> Duration {
        Duration::from_millis(self.number_interval_ms)
    }

    pub(crate) fn color_start_delay(&self) -> Duration {
        Duration::from_millis(self.color_start_delay_ms)
    }

    pub(crate) fn color_interval(&self) -> Duration {
        Duration::from_millis(self.color_interval_ms)
    }

    pub(crate) fn cycle_duration(&self) -> Duration {
        Duration::from_millis(self.cycle_duration_ms)
    }

    pub(crate) fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub(crate) fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::normal()
    }
}

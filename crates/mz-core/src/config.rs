//! Lock-layer policy constants.
//!
//! Only the relationship `short_delay_ticks < long_delay_ticks` is
//! load-bearing for correctness; the concrete values are tuning.

use crate::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MutexConfig {
    /// Ticks a holder may be absent from every bound region before release
    /// while another group is waiting on the slot.  Default: 6.
    pub short_delay_ticks: u64,

    /// Same, when nobody is waiting.  Default: 20.
    pub long_delay_ticks: u64,

    /// Ticks a growing path may go unused by its owner before it expires.
    /// Default: 2.
    pub path_idle_ticks: u64,

    /// Maximum edge length, in blocks, of a configured cuboid region.
    /// Larger declarations are clamped.  Default: 2000.
    pub max_zone_size: i32,

    /// Default stopping spacing in front of a path region.  Default: 1.0.
    pub path_spacing: f64,

    /// Default length budget for a growing path, in blocks.  Default: 64.
    pub path_max_distance: f64,

    /// Block radius used by `is_region_nearby` pre-checks.  Default: 2.
    pub nearby_radius: i32,
}

impl Default for MutexConfig {
    fn default() -> Self {
        Self {
            short_delay_ticks: 6,
            long_delay_ticks: 20,
            path_idle_ticks: 2,
            max_zone_size: 2000,
            path_spacing: 1.0,
            path_max_distance: 64.0,
            nearby_radius: 2,
        }
    }
}

impl MutexConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.short_delay_ticks == 0 {
            return Err(CoreError::Config("short_delay_ticks must be > 0".into()));
        }
        if self.short_delay_ticks >= self.long_delay_ticks {
            return Err(CoreError::Config(format!(
                "short_delay_ticks ({}) must be < long_delay_ticks ({})",
                self.short_delay_ticks, self.long_delay_ticks
            )));
        }
        if self.max_zone_size <= 0 {
            return Err(CoreError::Config("max_zone_size must be > 0".into()));
        }
        if !(self.path_max_distance > 0.0) {
            return Err(CoreError::Config("path_max_distance must be > 0".into()));
        }
        if !(self.path_spacing >= 0.0) {
            return Err(CoreError::Config("path_spacing must be >= 0".into()));
        }
        if self.nearby_radius < 0 {
            return Err(CoreError::Config("nearby_radius must be >= 0".into()));
        }
        Ok(())
    }
}

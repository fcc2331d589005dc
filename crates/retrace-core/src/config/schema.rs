use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetraceConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Per-axis slack when comparing `"x,y"` center points.
    #[serde(default = "default_center_point_tolerance_px")]
    pub center_point_tolerance_px: i32,
    /// How many ancestor levels the multi-parent strategies climb.
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
    #[serde(default = "default_enable_expensive_strategies")]
    pub enable_expensive_strategies: bool,
    /// Cap on the unique descendants folded into one "contains descendants" constraint.
    #[serde(default = "default_max_unique_descendants")]
    pub max_unique_descendants: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            center_point_tolerance_px: default_center_point_tolerance_px(),
            max_ancestor_depth: default_max_ancestor_depth(),
            enable_expensive_strategies: default_enable_expensive_strategies(),
            max_unique_descendants: default_max_unique_descendants(),
        }
    }
}

fn default_center_point_tolerance_px() -> i32 {
    5
}

fn default_max_ancestor_depth() -> usize {
    5
}

fn default_enable_expensive_strategies() -> bool {
    true
}

fn default_max_unique_descendants() -> usize {
    8
}

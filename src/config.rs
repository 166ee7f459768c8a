use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DISTANCE_K: f64 = 30.0;
const MIN_DISTANCE: f64 = 2.0;
const MAX_DISTANCE: f64 = 25.0;
const VOTE_WEIGHT: f64 = 1.5;

const SIZE_BASE: f64 = 12.0;
const SIZE_SCALE: f64 = 18.0;
const SIZE_ALPHA: f64 = 0.90;
const SIZE_MAX: f64 = 100.0;

const RELAX_ITERS: usize = 170;
const RELAX_PADDING: f64 = 2.25;
const REPEL_STRENGTH: f64 = 0.065;
const PULL_STRENGTH: f64 = 0.02;

const REASON_LIMIT: usize = 6;

/// Tunables for distance mapping, marker sizing and relaxation.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_k")]
    pub k: f64,
    #[serde(default = "default_min_d")]
    pub min_d: f64,
    #[serde(default = "default_max_d")]
    pub max_d: f64,
    #[serde(default = "default_vote_weight")]
    pub vote_weight: f64,

    #[serde(default = "default_size_base")]
    pub size_base: f64,
    #[serde(default = "default_size_scale")]
    pub size_scale: f64,
    #[serde(default = "default_size_alpha")]
    pub size_alpha: f64,
    #[serde(default = "default_size_max")]
    pub size_max: f64,

    #[serde(default = "default_iters")]
    pub iters: usize,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_repel_strength")]
    pub repel_strength: f64,
    #[serde(default = "default_pull_strength")]
    pub pull_strength: f64,
    /// Stop relaxing once an iteration's summed repulsive displacement drops
    /// below this value. `None` always runs the full `iters` budget.
    #[serde(default)]
    pub settle_threshold: Option<f64>,

    /// Maximum number of reasons listed in a hover payload.
    #[serde(default = "default_reason_limit")]
    pub reason_limit: usize,
}

fn default_k() -> f64 {
    DISTANCE_K
}
fn default_min_d() -> f64 {
    MIN_DISTANCE
}
fn default_max_d() -> f64 {
    MAX_DISTANCE
}
fn default_vote_weight() -> f64 {
    VOTE_WEIGHT
}
fn default_size_base() -> f64 {
    SIZE_BASE
}
fn default_size_scale() -> f64 {
    SIZE_SCALE
}
fn default_size_alpha() -> f64 {
    SIZE_ALPHA
}
fn default_size_max() -> f64 {
    SIZE_MAX
}
fn default_iters() -> usize {
    RELAX_ITERS
}
fn default_padding() -> f64 {
    RELAX_PADDING
}
fn default_repel_strength() -> f64 {
    REPEL_STRENGTH
}
fn default_pull_strength() -> f64 {
    PULL_STRENGTH
}
fn default_reason_limit() -> usize {
    REASON_LIMIT
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: DISTANCE_K,
            min_d: MIN_DISTANCE,
            max_d: MAX_DISTANCE,
            vote_weight: VOTE_WEIGHT,

            size_base: SIZE_BASE,
            size_scale: SIZE_SCALE,
            size_alpha: SIZE_ALPHA,
            size_max: SIZE_MAX,

            iters: RELAX_ITERS,
            padding: RELAX_PADDING,
            repel_strength: REPEL_STRENGTH,
            pull_strength: PULL_STRENGTH,
            settle_threshold: None,

            reason_limit: REASON_LIMIT,
        }
    }
}

impl LayoutConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(format!("YAML: {}", e)))
    }

    /// Parse a config file body, trying TOML first and then YAML.
    pub fn from_str_any(content: &str) -> Result<Self, ConfigError> {
        match Self::from_toml(content) {
            Ok(config) => Ok(config),
            Err(toml_err) => Self::from_yaml(content).map_err(|yaml_err| {
                ConfigError::Parse(format!("not valid TOML or YAML ({toml_err}; {yaml_err})"))
            }),
        }
    }

    /// Reject configurations the layout engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_fields = [
            ("k", self.k),
            ("min_d", self.min_d),
            ("max_d", self.max_d),
            ("vote_weight", self.vote_weight),
            ("size_base", self.size_base),
            ("size_scale", self.size_scale),
            ("size_alpha", self.size_alpha),
            ("size_max", self.size_max),
            ("padding", self.padding),
            ("repel_strength", self.repel_strength),
            ("pull_strength", self.pull_strength),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if let Some(threshold) = self.settle_threshold {
            if !threshold.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: "settle_threshold",
                });
            }
        }

        if self.iters == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        if self.min_d < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "min_d",
                value: self.min_d,
                expected: ">= 0",
            });
        }
        if self.max_d < self.min_d {
            return Err(ConfigError::InvertedDistanceRange {
                min_d: self.min_d,
                max_d: self.max_d,
            });
        }

        for (field, value) in [
            ("size_base", self.size_base),
            ("size_scale", self.size_scale),
            ("size_max", self.size_max),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSize { field, value });
            }
        }
        if self.size_max < self.size_base {
            return Err(ConfigError::OutOfRange {
                field: "size_max",
                value: self.size_max,
                expected: ">= size_base",
            });
        }
        if self.size_alpha <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "size_alpha",
                value: self.size_alpha,
                expected: "> 0",
            });
        }

        if self.padding <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "padding",
                value: self.padding,
                expected: "> 0",
            });
        }
        if self.repel_strength < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "repel_strength",
                value: self.repel_strength,
                expected: ">= 0",
            });
        }
        if !(0.0..=1.0).contains(&self.pull_strength) {
            return Err(ConfigError::OutOfRange {
                field: "pull_strength",
                value: self.pull_strength,
                expected: "within [0, 1]",
            });
        }
        if self.reason_limit == 0 {
            return Err(ConfigError::OutOfRange {
                field: "reason_limit",
                value: 0.0,
                expected: ">= 1",
            });
        }

        Ok(())
    }
}

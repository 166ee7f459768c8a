//! Deterministic radial trend maps.
//!
//! Each surveyed place becomes a point whose angle comes from a stable hash of
//! its name, whose distance from the center shrinks as its popularity metric
//! and local vote count grow, and whose marker size follows the vote count.
//! Overlapping markers are pushed apart by a fixed-budget relaxation that
//! keeps every point close to its original radius.

pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod survey;
pub mod trend;

pub use config::LayoutConfig;
pub use error::{ConfigError, InputError, RenderError};
pub use survey::{GroupAggregate, Mention, SurveyInput, aggregate_mentions};
pub use trend::{GroupLayout, LayoutReport, TrendLayout};

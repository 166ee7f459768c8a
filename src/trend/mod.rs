mod angle;
mod layout;
mod mapping;
mod rank;
mod relax;
mod types;

pub use angle::stable_angle;
pub use layout::{GroupLayout, HoverPayload, LayoutReport, TrendLayout, shared_plot_range};
pub use mapping::{marker_size, trend_distance};
pub use rank::rank_top_trends;
pub use relax::{footprint_radius, relax};
pub use types::{Body, Medal, Point, Position, RankedEntry, TrendCandidate};

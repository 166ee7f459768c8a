use serde::Serialize;

/// Cartesian position in layout units (same units as distance).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from the origin along `angle` (radians).
    pub fn from_polar(angle: f64, distance: f64) -> Self {
        Self::new(distance * angle.cos(), distance * angle.sin())
    }

    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Relaxer input: where a marker starts and how big it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Position,
    pub size: f64,
}

/// A placed survey place.
///
/// `angle`, `distance` and `size` are fixed when the point is built; only
/// `position` moves during relaxation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub place: String,
    pub angle: f64,
    pub distance: f64,
    pub position: Position,
    pub size: f64,
    pub count: u32,
    pub metric: f64,
    pub hover: String,
}

/// Input to the trend ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCandidate {
    pub place: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
}

impl Medal {
    pub fn symbol(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub place: String,
    pub distance: f64,
    pub rank: u8,
    pub medal: Medal,
}

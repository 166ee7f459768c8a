use serde::Serialize;
use tracing::{debug, info};

use super::angle::stable_angle;
use super::mapping::{marker_size, trend_distance};
use super::rank::rank_top_trends;
use super::relax::relax;
use super::types::{Body, Point, Position, RankedEntry, TrendCandidate};
use crate::config::LayoutConfig;
use crate::error::ConfigError;
use crate::survey::{GroupAggregate, SurveyInput};

const MIN_PLOT_RANGE: f64 = 10.0;
const PLOT_RANGE_MARGIN: f64 = 1.25;
const MORE_REASONS: &str = "…and more";
const NO_REASON: &str = "(no reason provided)";

/// Laid out points and top trends for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLayout {
    pub title: String,
    pub center_label: Option<String>,
    pub color: Option<String>,
    pub points: Vec<Point>,
    pub top_trends: Vec<RankedEntry>,
}

/// Everything a renderer needs: all groups plus one shared axis range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub plot_range: f64,
    pub groups: Vec<GroupLayout>,
}

/// Layout engine bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct TrendLayout {
    config: LayoutConfig,
}

impl TrendLayout {
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place, size, relax and rank one group's aggregates.
    ///
    /// `lookup_metric` returns the popularity metric of a place; places without
    /// a usable metric are dropped. Ranking uses the pre-relaxation distances.
    pub fn layout_group<F>(
        &self,
        title: &str,
        aggregates: &[GroupAggregate],
        lookup_metric: F,
    ) -> GroupLayout
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut points: Vec<Point> = Vec::with_capacity(aggregates.len());

        for aggregate in aggregates {
            let value = lookup_metric(&aggregate.place);
            let Some(distance) = trend_distance(value, aggregate.count, &self.config) else {
                debug!(
                    group = title,
                    place = %aggregate.place,
                    metric = ?value,
                    "place excluded from layout"
                );
                continue;
            };
            // trend_distance only places finite metrics above 1
            let metric = value.unwrap_or_default();

            let angle = stable_angle(&aggregate.place);
            let hover =
                HoverPayload::new(aggregate, Some(metric), distance, self.config.reason_limit);
            points.push(Point {
                place: aggregate.place.clone(),
                angle,
                distance,
                position: Position::from_polar(angle, distance),
                size: marker_size(aggregate.count, &self.config),
                count: aggregate.count,
                metric,
                hover: hover.to_string(),
            });
        }

        let candidates: Vec<TrendCandidate> = points
            .iter()
            .map(|p| TrendCandidate {
                place: p.place.clone(),
                distance: p.distance,
            })
            .collect();
        let top_trends = rank_top_trends(&candidates);

        let bodies: Vec<Body> = points
            .iter()
            .map(|p| Body {
                position: p.position,
                size: p.size,
            })
            .collect();
        for (point, position) in points.iter_mut().zip(relax(&bodies, &self.config)) {
            point.position = position;
        }

        info!(
            group = title,
            places = aggregates.len(),
            placed = points.len(),
            top = top_trends.len(),
            "group laid out"
        );

        GroupLayout {
            title: title.to_string(),
            center_label: None,
            color: None,
            points,
            top_trends,
        }
    }

    /// Lay out every group of a survey and compute the shared plot range.
    pub fn layout_survey(&self, survey: &SurveyInput) -> LayoutReport {
        let groups: Vec<GroupLayout> = survey
            .groups
            .iter()
            .map(|group| {
                let aggregates = group.aggregates();
                let layout =
                    self.layout_group(&group.title, &aggregates, |place| survey.metric(place));
                GroupLayout {
                    center_label: group.center_label.clone(),
                    color: group.color.clone(),
                    ..layout
                }
            })
            .collect();

        LayoutReport {
            plot_range: shared_plot_range(&groups),
            groups,
        }
    }
}

/// Symmetric axis range shared by all groups: `max(10, 1.25 * max |x|, |y|)`.
pub fn shared_plot_range(groups: &[GroupLayout]) -> f64 {
    let max_abs = groups
        .iter()
        .flat_map(|g| g.points.iter())
        .map(|p| p.position.x.abs().max(p.position.y.abs()))
        .fold(0.0, f64::max);
    (max_abs * PLOT_RANGE_MARGIN).max(MIN_PLOT_RANGE)
}

/// Hover text for one point.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPayload {
    pub place: String,
    pub count: u32,
    pub metric: Option<f64>,
    pub distance: f64,
    pub reasons: Vec<String>,
    pub truncated: bool,
}

impl HoverPayload {
    pub fn new(
        aggregate: &GroupAggregate,
        metric: Option<f64>,
        distance: f64,
        limit: usize,
    ) -> Self {
        Self {
            place: aggregate.place.clone(),
            count: aggregate.count,
            metric,
            distance,
            reasons: aggregate.reasons.iter().take(limit).cloned().collect(),
            truncated: aggregate.reasons.len() > limit,
        }
    }
}

impl std::fmt::Display for HoverPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let metric = self
            .metric
            .map(format_metric)
            .unwrap_or_else(|| "N/A".to_string());

        writeln!(f, "{}", self.place)?;
        writeln!(f, "Votes · {}", self.count)?;
        writeln!(f, "Search volume · {}", metric)?;
        writeln!(f, "Distance · {:.2}", self.distance)?;
        writeln!(f)?;
        write!(f, "Reasons")?;

        if self.reasons.is_empty() {
            write!(f, "\n• {}", NO_REASON)?;
        }
        for reason in &self.reasons {
            write!(f, "\n• {}", reason)?;
        }
        if self.truncated {
            write!(f, "\n• {}", MORE_REASONS)?;
        }
        Ok(())
    }
}

/// `1234567` -> `1,234,567`; fractional metrics keep their fraction.
fn format_metric(value: f64) -> String {
    let text = value.to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{Mention, SurveyGroup, aggregate_mentions};
    use std::collections::HashMap;

    fn aggregate(place: &str, count: u32, reasons: &[&str]) -> GroupAggregate {
        GroupAggregate {
            place: place.to_string(),
            count,
            reasons: reasons.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = LayoutConfig {
            iters: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(TrendLayout::new(config).unwrap_err(), ConfigError::InvalidIterations);
    }

    #[test]
    fn empty_group_yields_empty_layout() {
        let engine = TrendLayout::new(LayoutConfig::default()).unwrap();
        let layout = engine.layout_group("empty", &[], |_| None);
        assert!(layout.points.is_empty());
        assert!(layout.top_trends.is_empty());
    }

    #[test]
    fn places_without_metric_are_dropped() {
        let engine = TrendLayout::new(LayoutConfig::default()).unwrap();
        let metrics: HashMap<&str, f64> = [("a", 1e6), ("b", 1.0)].into_iter().collect();
        let aggregates = [aggregate("a", 1, &[]), aggregate("b", 2, &[]), aggregate("c", 3, &[])];
        let layout = engine.layout_group("g", &aggregates, |p| metrics.get(p).copied());
        assert_eq!(layout.points.len(), 1);
        assert_eq!(layout.points[0].place, "a");
        assert_eq!(layout.top_trends.len(), 1);
    }

    #[test]
    fn ranking_uses_pre_relaxation_distance() {
        let engine = TrendLayout::new(LayoutConfig::default()).unwrap();
        let metrics: HashMap<&str, f64> =
            [("near", 1e10), ("mid", 1e5), ("far", 1e3)].into_iter().collect();
        let aggregates = [
            aggregate("far", 1, &[]),
            aggregate("near", 1, &[]),
            aggregate("mid", 1, &[]),
        ];
        let layout = engine.layout_group("g", &aggregates, |p| metrics.get(p).copied());

        let near = layout.points.iter().find(|p| p.place == "near").unwrap();
        assert!((near.distance - 3.0).abs() < 1e-9);

        let top: Vec<&str> = layout.top_trends.iter().map(|e| e.place.as_str()).collect();
        assert_eq!(top, ["near", "mid"]);
        assert!((layout.top_trends[1].distance - 6.0).abs() < 1e-9);
    }

    #[test]
    fn survey_layout_carries_group_metadata() {
        let survey = SurveyInput {
            metrics: [("shibuya".to_string(), Some(5e7))].into_iter().collect(),
            groups: vec![SurveyGroup {
                title: "Tokyo · Male".to_string(),
                center_label: Some("TOKYO".to_string()),
                color: Some("#2ca02c".to_string()),
                mentions: vec![Mention::new("shibuya", Some("nightlife"))],
            }],
        };
        let engine = TrendLayout::new(LayoutConfig::default()).unwrap();
        let report = engine.layout_survey(&survey);

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].center_label.as_deref(), Some("TOKYO"));
        assert_eq!(report.groups[0].color.as_deref(), Some("#2ca02c"));
        assert_eq!(report.plot_range, 10.0);
    }

    #[test]
    fn plot_range_grows_with_far_points() {
        let engine = TrendLayout::new(LayoutConfig::default()).unwrap();
        let aggregates = aggregate_mentions(&[Mention::new("edge", None)]);
        let layout = engine.layout_group("g", &aggregates, |_| Some(2.0));
        // a lone point at the max distance of 25
        let range = shared_plot_range(&[layout.clone()]);
        let p = layout.points[0].position;
        assert!((range - 1.25 * p.x.abs().max(p.y.abs())).abs() < 1e-9);
        assert!(range > 10.0);
    }

    #[test]
    fn plot_range_has_a_floor() {
        assert_eq!(shared_plot_range(&[]), 10.0);
    }

    #[test]
    fn hover_text_lists_reasons() {
        let hover = HoverPayload::new(&aggregate("namsan", 3, &["view", "walk"]), Some(1234567.0), 4.567, 6);
        assert_eq!(
            hover.to_string(),
            "namsan\nVotes · 3\nSearch volume · 1,234,567\nDistance · 4.57\n\nReasons\n• view\n• walk"
        );
    }

    #[test]
    fn hover_text_caps_reasons() {
        let reasons = ["a", "b", "c", "d", "e", "f", "g"];
        let hover = HoverPayload::new(&aggregate("x", 7, &reasons), None, 2.0, 6);
        let text = hover.to_string();
        assert!(text.contains("Search volume · N/A"));
        assert!(text.contains("• f\n• …and more"));
        assert!(!text.contains("• g"));
    }

    #[test]
    fn hover_text_without_reasons() {
        let hover = HoverPayload::new(&aggregate("x", 1, &[]), Some(50.0), 2.0, 6);
        assert!(hover.to_string().ends_with("Reasons\n• (no reason provided)"));
    }

    #[test]
    fn metric_formatting() {
        assert_eq!(format_metric(0.0), "0");
        assert_eq!(format_metric(999.0), "999");
        assert_eq!(format_metric(1000.0), "1,000");
        assert_eq!(format_metric(12345678.0), "12,345,678");
        assert_eq!(format_metric(1500.5), "1,500.5");
    }
}

//! Survey input: place mentions per group and the popularity metric per place.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::InputError;

/// One answer naming a place, optionally with the reason given for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mention {
    pub place: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Mention {
    pub fn new(place: impl Into<String>, reason: Option<&str>) -> Self {
        Self {
            place: place.into(),
            reason: reason.map(str::to_string),
        }
    }
}

/// All mentions of one place within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAggregate {
    pub place: String,
    pub count: u32,
    /// Distinct reasons in order of first appearance.
    pub reasons: Vec<String>,
}

impl GroupAggregate {
    fn new(place: String) -> Self {
        Self {
            place,
            count: 0,
            reasons: Vec::new(),
        }
    }

    fn record(&mut self, reason: Option<&str>) {
        self.count += 1;
        if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
            if !self.reasons.iter().any(|r| r == reason) {
                self.reasons.push(reason.to_string());
            }
        }
    }
}

/// Fold mentions into per-place aggregates, keeping first-mention order.
///
/// Place names and reasons are trimmed; blank places are skipped and blank
/// reasons still count as a vote.
pub fn aggregate_mentions<'a, I>(mentions: I) -> Vec<GroupAggregate>
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut aggregates: Vec<GroupAggregate> = Vec::new();
    let mut index_by_place: HashMap<String, usize> = HashMap::new();

    for mention in mentions {
        let place = mention.place.trim();
        if place.is_empty() {
            continue;
        }

        let idx = match index_by_place.get(place) {
            Some(&idx) => idx,
            None => {
                aggregates.push(GroupAggregate::new(place.to_string()));
                index_by_place.insert(place.to_string(), aggregates.len() - 1);
                aggregates.len() - 1
            }
        };
        aggregates[idx].record(mention.reason.as_deref());
    }

    aggregates
}

/// One demographic group of the survey.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyGroup {
    pub title: String,
    /// Label for the reference point drawn at the origin.
    #[serde(default)]
    pub center_label: Option<String>,
    /// Marker color for the renderer, e.g. `#1f77b4`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl SurveyGroup {
    pub fn aggregates(&self) -> Vec<GroupAggregate> {
        aggregate_mentions(&self.mentions)
    }
}

/// A complete survey document: shared metrics plus the groups to lay out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyInput {
    /// Popularity metric per place. `null` marks a place with no signal.
    #[serde(default)]
    pub metrics: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub groups: Vec<SurveyGroup>,
}

impl SurveyInput {
    pub fn from_json(content: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn metric(&self, place: &str) -> Option<f64> {
        self.metrics.get(place).copied().flatten()
    }
}

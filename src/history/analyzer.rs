//! History analyzer — folds past recipe records into per-cuisine and
//! per-difficulty statistics and proposes cuisine rating changes.
//!
//! Suggestions are never applied here; see
//! [`PreferenceStore::apply_suggestion`](crate::preferences::PreferenceStore::apply_suggestion).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::record::{records_from_json, HistoricalRecipeRecord};
use crate::error::ValidationError;
use crate::preferences::{known_cuisines, normalize_key, Category, Rating};

/// Rated occurrences a cuisine needs before it can drive a suggestion.
pub const MIN_RATED_OCCURRENCES: usize = 2;
/// Averages at or above this suggest "like".
pub const LIKE_AVERAGE: f64 = 4.0;
/// Averages at or below this suggest "dislike".
pub const DISLIKE_AVERAGE: f64 = 2.0;
/// At most this many favorite cuisines are reported.
pub const FAVORITE_LIMIT: usize = 3;
/// Occurrences a cuisine needs to count as a favorite.
pub const FAVORITE_MIN_COUNT: usize = 2;
/// Records needed before unused catalog cuisines count as avoided.
pub const AVOIDED_MIN_RECORDS: usize = 5;

/// Aggregates for one cuisine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CuisineStats {
    /// Records tagged with this cuisine.
    pub count: usize,
    /// Of those, records with a usable star rating.
    pub rated_count: usize,
    pub rating_sum: u32,
    /// Mean star rating, absent when nothing was rated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl CuisineStats {
    fn mean(&self) -> Option<f64> {
        (self.rated_count > 0).then(|| f64::from(self.rating_sum) / self.rated_count as f64)
    }
}

/// A proposed rating change awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedDelta {
    pub category: Category,
    pub key: String,
    pub suggested_rating: Rating,
    pub rationale: String,
}

/// Everything learned from one batch of history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total_records: usize,
    pub cuisines: BTreeMap<String, CuisineStats>,
    pub difficulty_counts: BTreeMap<String, usize>,
    pub meal_type_counts: BTreeMap<String, usize>,
    /// Records per star value.
    pub rating_distribution: BTreeMap<u8, usize>,
    /// Up to three most used cuisines seen at least twice, count descending.
    pub favorite_cuisines: Vec<String>,
    /// Catalog cuisines never used; only filled from five records up.
    pub avoided_cuisines: Vec<String>,
    /// Most frequent difficulty; ties go to the alphabetically first.
    pub preferred_difficulty: Option<String>,
    pub average_prep_minutes: Option<f64>,
    pub average_cook_minutes: Option<f64>,
    pub suggestions: Vec<SuggestedDelta>,
}

impl AnalysisReport {
    pub fn cuisine_count(&self, cuisine: &str) -> usize {
        self.cuisines
            .get(&normalize_key(cuisine))
            .map_or(0, |s| s.count)
    }

    pub fn cuisine_average(&self, cuisine: &str) -> Option<f64> {
        self.cuisines
            .get(&normalize_key(cuisine))
            .and_then(|s| s.average)
    }

    pub fn difficulty_count(&self, difficulty: &str) -> usize {
        self.difficulty_counts
            .get(&normalize_key(difficulty))
            .copied()
            .unwrap_or(0)
    }
}

/// Map an average star rating onto a suggested cuisine rating.
///
/// | average      | suggestion |
/// |--------------|------------|
/// | >= 4.0       | +1         |
/// | (2.0, 4.0)   | none       |
/// | <= 2.0       | -1         |
pub fn suggestion_for_average(average: f64) -> Option<Rating> {
    if average >= LIKE_AVERAGE {
        Some(Rating::LIKE)
    } else if average <= DISLIKE_AVERAGE {
        Some(Rating::DISLIKE)
    } else {
        None
    }
}

/// Running totals while walking the records.
#[derive(Debug, Default)]
struct Tally {
    total: usize,
    cuisines: BTreeMap<String, CuisineStats>,
    difficulties: BTreeMap<String, usize>,
    meal_types: BTreeMap<String, usize>,
    ratings: BTreeMap<u8, usize>,
    prep: Mean,
    cook: Mean,
}

#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// Normalized, non-empty, unique keys.
fn distinct_keys(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|s| normalize_key(s))
        .filter(|s| !s.is_empty())
        .collect()
}

impl Tally {
    fn record(&mut self, record: &HistoricalRecipeRecord) {
        self.total += 1;
        let stars = record.stars();

        for cuisine in distinct_keys(&record.cuisines) {
            let stats = self.cuisines.entry(cuisine).or_default();
            stats.count += 1;
            if let Some(s) = stars {
                stats.rating_sum += u32::from(s);
                stats.rated_count += 1;
            }
        }

        for meal_type in distinct_keys(&record.meal_types) {
            *self.meal_types.entry(meal_type).or_insert(0) += 1;
        }

        if let Some(difficulty) = record.difficulty.as_deref().map(normalize_key) {
            if !difficulty.is_empty() {
                *self.difficulties.entry(difficulty).or_insert(0) += 1;
            }
        }

        if let Some(s) = stars {
            *self.ratings.entry(s).or_insert(0) += 1;
        }

        self.prep.push(record.prep_minutes.filter(|m| m.is_finite() && *m >= 0.0));
        self.cook.push(record.cook_minutes.filter(|m| m.is_finite() && *m >= 0.0));
    }

    fn finish(mut self) -> AnalysisReport {
        for stats in self.cuisines.values_mut() {
            stats.average = stats.mean();
        }

        let suggestions = self
            .cuisines
            .iter()
            .filter(|(_, stats)| stats.rated_count >= MIN_RATED_OCCURRENCES)
            .filter_map(|(cuisine, stats)| {
                let average = stats.average?;
                let rating = suggestion_for_average(average)?;
                Some(SuggestedDelta {
                    category: Category::Cuisine,
                    key: cuisine.clone(),
                    suggested_rating: rating,
                    rationale: format!(
                        "average rating {average:.1} across {} rated {cuisine} recipes",
                        stats.rated_count
                    ),
                })
            })
            .collect();

        let mut preferred_difficulty: Option<(&String, usize)> = None;
        for (name, &count) in &self.difficulties {
            if preferred_difficulty.map_or(true, |(_, best)| count > best) {
                preferred_difficulty = Some((name, count));
            }
        }
        let preferred_difficulty = preferred_difficulty.map(|(name, _)| name.clone());

        let mut ranked: Vec<(&String, usize)> = self
            .cuisines
            .iter()
            .map(|(name, stats)| (name, stats.count))
            .filter(|&(_, count)| count >= FAVORITE_MIN_COUNT)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let favorite_cuisines = ranked
            .into_iter()
            .take(FAVORITE_LIMIT)
            .map(|(name, _)| name.clone())
            .collect();

        let avoided_cuisines = if self.total >= AVOIDED_MIN_RECORDS {
            known_cuisines()
                .filter(|c| !self.cuisines.contains_key(*c))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };

        AnalysisReport {
            total_records: self.total,
            favorite_cuisines,
            avoided_cuisines,
            preferred_difficulty,
            average_prep_minutes: self.prep.value(),
            average_cook_minutes: self.cook.value(),
            cuisines: self.cuisines,
            difficulty_counts: self.difficulties,
            meal_type_counts: self.meal_types,
            rating_distribution: self.ratings,
            suggestions,
        }
    }
}

/// Analyze a batch of history records. Never fails on malformed fields.
pub fn analyze_recipes(records: &[HistoricalRecipeRecord]) -> AnalysisReport {
    let mut tally = Tally::default();
    for record in records {
        tally.record(record);
    }
    let report = tally.finish();
    debug!(
        records = report.total_records,
        cuisines = report.cuisines.len(),
        suggestions = report.suggestions.len(),
        "analyzed recipe history"
    );
    report
}

/// Analyze an exported JSON array of database rows.
pub fn analyze_json(value: &Value) -> Result<AnalysisReport, ValidationError> {
    let records = records_from_json(value)?;
    Ok(analyze_recipes(&records))
}

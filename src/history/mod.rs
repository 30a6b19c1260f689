//! History engine — learns cuisine preferences from past recipe records.
//!
//! Records come from an external recipe database; this module only turns
//! them into an [`AnalysisReport`] with suggested rating changes. Applying a
//! suggestion is a separate, explicit step on the preference store.

pub mod analyzer;
pub mod record;
pub mod summary;

pub use analyzer::{
    analyze_json, analyze_recipes, suggestion_for_average, AnalysisReport, CuisineStats,
    SuggestedDelta, AVOIDED_MIN_RECORDS, DISLIKE_AVERAGE, FAVORITE_LIMIT, FAVORITE_MIN_COUNT,
    LIKE_AVERAGE, MIN_RATED_OCCURRENCES,
};
pub use record::{records_from_json, records_from_json_str, HistoricalRecipeRecord, RawRating};
pub use summary::{format_analysis_summary, Summary};

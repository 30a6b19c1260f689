//! Markdown rendering of an [`AnalysisReport`].

use std::collections::BTreeMap;
use std::fmt;

use super::analyzer::AnalysisReport;

/// Entries by count descending, ties by name ascending.
fn ranked<'a, I>(counts: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = (&'a String, usize)>,
{
    let mut rows: Vec<_> = counts.into_iter().map(|(k, c)| (k.as_str(), c)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

fn breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    counts: &BTreeMap<String, usize>,
) -> fmt::Result {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(f, "### {title}")?;
    for (name, count) in ranked(counts.iter().map(|(k, &c)| (k, c))) {
        writeln!(f, "- {name}: {count}")?;
    }
    writeln!(f)
}

/// Display adapter that renders a report as markdown.
pub struct Summary<'a>(pub &'a AnalysisReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "## Meal History Analysis\n")?;
        writeln!(f, "**Total Recipes:** {}", report.total_records)?;

        if !report.favorite_cuisines.is_empty() {
            writeln!(
                f,
                "**Favorite Cuisines:** {}",
                report.favorite_cuisines.join(", ")
            )?;
        }
        if let Some(difficulty) = &report.preferred_difficulty {
            writeln!(f, "**Preferred Difficulty:** {difficulty}")?;
        }
        if let Some(prep) = report.average_prep_minutes {
            writeln!(f, "**Average Prep Time:** {prep:.1} minutes")?;
        }
        if let Some(cook) = report.average_cook_minutes {
            writeln!(f, "**Average Cook Time:** {cook:.1} minutes")?;
        }
        writeln!(f)?;

        if !report.cuisines.is_empty() {
            writeln!(f, "### Cuisine Breakdown")?;
            for (name, count) in ranked(report.cuisines.iter().map(|(k, s)| (k, s.count))) {
                let stats = &report.cuisines[name];
                match stats.average {
                    Some(avg) => writeln!(
                        f,
                        "- {name}: {count} (avg {avg:.1} from {} rated)",
                        stats.rated_count
                    )?,
                    None => writeln!(f, "- {name}: {count}")?,
                }
            }
            writeln!(f)?;
        }

        breakdown(f, "Difficulty Breakdown", &report.difficulty_counts)?;
        breakdown(f, "Meal Types", &report.meal_type_counts)?;

        if !report.rating_distribution.is_empty() {
            writeln!(f, "### Rating Distribution")?;
            for (stars, count) in report.rating_distribution.iter().rev() {
                writeln!(
                    f,
                    "- {} ({stars}): {count} recipes",
                    "*".repeat(usize::from(*stars))
                )?;
            }
            writeln!(f)?;
        }

        if !report.suggestions.is_empty() {
            writeln!(f, "### Suggested Preference Updates")?;
            for s in &report.suggestions {
                writeln!(
                    f,
                    "- Set **{}** ({}) to `{}` ({})",
                    s.key,
                    s.category,
                    s.suggested_rating.label(),
                    s.suggested_rating
                )?;
                writeln!(f, "  - Reason: {}", s.rationale)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Human-readable summary of a report. Pure formatting; deterministic.
pub fn format_analysis_summary(report: &AnalysisReport) -> String {
    Summary(report).to_string()
}

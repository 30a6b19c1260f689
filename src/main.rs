//! PrepWise CLI — inspect and edit the preference profile, and learn from
//! exported recipe history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use prepwise::config::Config;
use prepwise::history::{analyze_recipes, format_analysis_summary, records_from_json_str};
use prepwise::logging;
use prepwise::preferences::{
    setup_questions, FieldUpdate, MacroUpdate, Mutation, PreferenceStore, QuestionKind,
    YamlFileStorage,
};

#[derive(Parser)]
#[command(name = "prepwise")]
#[command(version, about = "PrepWise - meal-planning preferences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Preference profile file (default: ~/.prepwise/preferences.yaml)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current profile
    Show,

    /// Rate an item from -2 (strongly dislike) to 2 (love); 0 removes it
    Set {
        /// ingredient, cuisine or cooking_method
        category: String,
        item: String,
        #[arg(allow_negative_numbers = true)]
        rating: i64,
    },

    /// Update daily macro targets (a number, or "clear")
    Macros {
        #[arg(long, value_parser = parse_field_update)]
        calories: Option<FieldUpdate>,
        #[arg(long, value_parser = parse_field_update)]
        protein: Option<FieldUpdate>,
        #[arg(long, value_parser = parse_field_update)]
        carbs: Option<FieldUpdate>,
        #[arg(long, value_parser = parse_field_update)]
        fat: Option<FieldUpdate>,
    },

    /// Add or remove dietary restrictions
    Restrictions {
        #[arg(short, long)]
        add: Vec<String>,
        #[arg(short, long)]
        remove: Vec<String>,
    },

    /// Mark the setup questionnaire as done
    CompleteSetup,

    /// List the setup questionnaire
    Questions,

    /// Analyze an exported recipe history (JSON array of rows)
    Analyze {
        path: PathBuf,

        /// Apply every suggested change to the profile
        #[arg(long)]
        apply: bool,
    },

    /// Delete the stored profile
    Reset,
}

fn parse_field_update(s: &str) -> Result<FieldUpdate, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("clear") {
        return Ok(FieldUpdate::Clear);
    }
    s.parse::<i64>()
        .map(FieldUpdate::Set)
        .map_err(|_| format!("expected a whole number or \"clear\", got `{s}`"))
}

fn print_profile(store: &PreferenceStore) -> Result<()> {
    print!("{}", serde_yaml::to_string(&store.get_profile())?);
    Ok(())
}

/// Report a write-through failure without discarding the in-memory result.
fn report(mutation: Mutation) -> Result<()> {
    if let Err(e) = &mutation.persisted {
        warn!("changes were not saved: {e}");
    }
    print!("{}", serde_yaml::to_string(&mutation.profile)?);
    mutation
        .persisted
        .context("profile updated but could not be saved")
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let path = cli
        .profile
        .or(config.profile_path)
        .unwrap_or_else(prepwise::preferences::default_profile_path);
    let store = PreferenceStore::open(YamlFileStorage::new(&path))
        .with_context(|| format!("loading profile from {}", path.display()))?;

    match cli.command {
        Commands::Show => print_profile(&store)?,
        Commands::Set {
            category,
            item,
            rating,
        } => report(store.update_preference(&category, &item, rating)?)?,
        Commands::Macros {
            calories,
            protein,
            carbs,
            fat,
        } => {
            let update = MacroUpdate {
                calories: calories.unwrap_or_default(),
                protein_g: protein.unwrap_or_default(),
                carbs_g: carbs.unwrap_or_default(),
                fat_g: fat.unwrap_or_default(),
            };
            report(store.update_macro_targets(&update)?)?;
        }
        Commands::Restrictions { add, remove } => {
            report(store.update_dietary_restrictions(&add, &remove))?
        }
        Commands::CompleteSetup => report(store.complete_setup())?,
        Commands::Questions => {
            for question in setup_questions() {
                println!("{} ({})", question.prompt, question.id);
                for option in &question.options {
                    match (question.kind, option.suggested) {
                        (QuestionKind::MacroTargets, Some(v)) => {
                            println!("  - {} [{}] default {v}", option.label, option.key)
                        }
                        _ => println!("  - {} [{}]", option.label, option.key),
                    }
                }
            }
        }
        Commands::Analyze { path, apply } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let records = records_from_json_str(&text)?;
            let analysis = analyze_recipes(&records);
            print!("{}", format_analysis_summary(&analysis));
            if apply {
                for delta in &analysis.suggestions {
                    let mutation = store.apply_suggestion(delta)?;
                    mutation
                        .persisted
                        .context("suggestion applied but could not be saved")?;
                    println!(
                        "applied: {} {} -> {}",
                        delta.category, delta.key, delta.suggested_rating
                    );
                }
            }
        }
        Commands::Reset => {
            let mutation = store.reset();
            mutation.persisted.context("could not delete stored profile")?;
            println!("profile reset");
            return Ok(());
        }
    }

    store.close().context("final profile flush")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    if let Err(e) = logging::init(level) {
        eprintln!("logging disabled: {e}");
    }
    run(cli, config)
}

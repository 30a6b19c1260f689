//! Setup questionnaire — the fixed catalog presented on first run.

use serde::Serialize;

use super::profile::Category;

/// What a setup question asks the user to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Rate each option on the -2..=2 scale.
    Rating(Category),
    /// Pick any number of dietary restrictions.
    Restrictions,
    /// Enter daily macro targets.
    MacroTargets,
}

/// One selectable answer. `key` is already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub key: &'static str,
    pub label: &'static str,
    /// Pre-filled value for numeric prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupQuestion {
    pub id: &'static str,
    pub kind: QuestionKind,
    pub prompt: &'static str,
    pub options: Vec<QuestionOption>,
}

const INGREDIENTS: &[(&str, &str)] = &[
    ("cilantro", "cilantro/coriander"),
    ("mushrooms", "mushrooms"),
    ("olives", "olives"),
    ("spicy_food", "spicy food"),
    ("seafood", "seafood"),
    ("tofu", "tofu"),
    ("avocado", "avocado"),
    ("coconut", "coconut"),
    ("blue_cheese", "blue cheese / strong cheeses"),
    ("raw_onion", "raw onions"),
    ("bell_peppers", "bell peppers"),
    ("eggplant", "eggplant"),
    ("beans", "beans/legumes"),
    ("nuts", "nuts"),
];

const CUISINES: &[(&str, &str)] = &[
    ("mexican", "Mexican"),
    ("italian", "Italian"),
    ("chinese", "Chinese"),
    ("japanese", "Japanese"),
    ("indian", "Indian"),
    ("thai", "Thai"),
    ("mediterranean", "Mediterranean"),
    ("american", "American"),
    ("korean", "Korean"),
    ("vietnamese", "Vietnamese"),
    ("middle eastern", "Middle Eastern"),
    ("greek", "Greek"),
    ("french", "French"),
];

const COOKING_METHODS: &[(&str, &str)] = &[
    ("quick_meals", "Quick meals (under 30 min)"),
    ("slow_cooker", "Slow cooker / crockpot"),
    ("air_fryer", "Air fryer"),
    ("grilling", "Grilling / BBQ"),
    ("meal_prep", "Batch cooking / meal prep"),
    ("one_pot", "One-pot meals"),
    ("sheet_pan", "Sheet pan dinners"),
    ("instant_pot", "Instant Pot / pressure cooker"),
    ("stir_fry", "Stir fry"),
    ("baking", "Baking"),
];

const DIETARY_OPTIONS: &[&str] = &[
    "dairy-free",
    "gluten-free",
    "vegetarian",
    "vegan",
    "keto",
    "low-carb",
    "nut-free",
    "egg-free",
    "pescatarian",
    "halal",
    "kosher",
];

const MACROS: &[(&str, &str, u32)] = &[
    ("calories", "Daily calories", 2000),
    ("protein_g", "Daily protein (g)", 150),
    ("carbs_g", "Daily carbohydrates (g)", 200),
    ("fat_g", "Daily fat (g)", 70),
];

fn options(pairs: &[(&'static str, &'static str)]) -> Vec<QuestionOption> {
    pairs
        .iter()
        .map(|&(key, label)| QuestionOption {
            key,
            label,
            suggested: None,
        })
        .collect()
}

/// Cuisine keys offered during setup, in catalog order.
pub fn known_cuisines() -> impl Iterator<Item = &'static str> {
    CUISINES.iter().map(|&(key, _)| key)
}

/// The setup catalog, in presentation order. Independent of any profile.
pub fn setup_questions() -> Vec<SetupQuestion> {
    vec![
        SetupQuestion {
            id: "ingredients",
            kind: QuestionKind::Rating(Category::Ingredient),
            prompt: "How do you feel about these ingredients?",
            options: options(INGREDIENTS),
        },
        SetupQuestion {
            id: "cuisines",
            kind: QuestionKind::Rating(Category::Cuisine),
            prompt: "Which cuisines do you enjoy?",
            options: options(CUISINES),
        },
        SetupQuestion {
            id: "cooking_methods",
            kind: QuestionKind::Rating(Category::CookingMethod),
            prompt: "Which cooking styles fit your week?",
            options: options(COOKING_METHODS),
        },
        SetupQuestion {
            id: "dietary_restrictions",
            kind: QuestionKind::Restrictions,
            prompt: "Any dietary restrictions or allergies?",
            options: DIETARY_OPTIONS
                .iter()
                .map(|&key| QuestionOption {
                    key,
                    label: key,
                    suggested: None,
                })
                .collect(),
        },
        SetupQuestion {
            id: "macro_targets",
            kind: QuestionKind::MacroTargets,
            prompt: "Daily macro targets (leave blank to skip)",
            options: MACROS
                .iter()
                .map(|&(key, label, default)| QuestionOption {
                    key,
                    label,
                    suggested: Some(default),
                })
                .collect(),
        },
    ]
}

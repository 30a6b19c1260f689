//! Preference profile — serializable user taste data and its validated mutations.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Current profile schema version.
pub const PROFILE_VERSION: u32 = 1;

/// Lowercase and trim a user-supplied key.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// What kind of item a rating applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ingredient,
    Cuisine,
    CookingMethod,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Ingredient, Self::Cuisine, Self::CookingMethod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredient => "ingredient",
            Self::Cuisine => "cuisine",
            Self::CookingMethod => "cooking_method",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ingredient" => Ok(Self::Ingredient),
            "cuisine" => Ok(Self::Cuisine),
            "cooking_method" => Ok(Self::CookingMethod),
            other => Err(ValidationError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// A point on the -2..=2 affinity scale. Zero means "no preference".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(i8);

impl Rating {
    pub const STRONGLY_DISLIKE: Rating = Rating(-2);
    pub const DISLIKE: Rating = Rating(-1);
    pub const NEUTRAL: Rating = Rating(0);
    pub const LIKE: Rating = Rating(1);
    pub const LOVE: Rating = Rating(2);

    pub const MIN: i64 = -2;
    pub const MAX: i64 = 2;

    /// Validate `value` as the rating for `field`.
    pub fn new(field: &str, value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(ValidationError::RatingOutOfRange {
                field: field.to_string(),
                value,
            })
        }
    }

    pub fn value(self) -> i8 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }

    /// User-facing word for this point on the scale.
    pub fn label(self) -> &'static str {
        match self.0 {
            -2 => "strongly dislike",
            -1 => "dislike",
            1 => "like",
            2 => "love",
            _ => "neutral",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new("rating", value)
    }
}

impl From<Rating> for i64 {
    fn from(r: Rating) -> Self {
        i64::from(r.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Daily macronutrient targets. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroTargets {
    pub calories: Option<u32>,
    pub protein_g: Option<u32>,
    pub carbs_g: Option<u32>,
    pub fat_g: Option<u32>,
}

/// Change requested for a single macro field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    #[default]
    Keep,
    Set(i64),
    Clear,
}

impl FieldUpdate {
    fn resolve(self, field: &'static str) -> Result<Option<Option<u32>>, ValidationError> {
        match self {
            Self::Keep => Ok(None),
            Self::Clear => Ok(Some(None)),
            Self::Set(value) => u32::try_from(value)
                .map(|v| Some(Some(v)))
                .map_err(|_| ValidationError::InvalidMacroValue { field, value }),
        }
    }
}

/// Partial update of [`MacroTargets`]; unset fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacroUpdate {
    pub calories: FieldUpdate,
    pub protein_g: FieldUpdate,
    pub carbs_g: FieldUpdate,
    pub fat_g: FieldUpdate,
}

/// Persistent preference profile stored at `~/.prepwise/preferences.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreferenceProfile {
    /// Ingredient ratings keyed by normalized name.
    pub ingredients: BTreeMap<String, Rating>,
    /// Cuisine ratings keyed by normalized name.
    pub cuisines: BTreeMap<String, Rating>,
    /// Cooking method ratings keyed by normalized name.
    pub cooking_methods: BTreeMap<String, Rating>,
    /// Dietary restrictions and allergies, e.g. "gluten-free".
    pub dietary_restrictions: BTreeSet<String>,
    pub macro_targets: MacroTargets,
    /// Whether the setup questionnaire has been completed.
    pub setup_completed: bool,
    /// Profile schema version for forward compatibility.
    pub version: u32,
}

impl PreferenceProfile {
    /// Create a new empty profile.
    pub fn new() -> Self {
        Self {
            ingredients: BTreeMap::new(),
            cuisines: BTreeMap::new(),
            cooking_methods: BTreeMap::new(),
            dietary_restrictions: BTreeSet::new(),
            macro_targets: MacroTargets::default(),
            setup_completed: false,
            version: PROFILE_VERSION,
        }
    }

    /// Ratings for one category.
    pub fn ratings(&self, category: Category) -> &BTreeMap<String, Rating> {
        match category {
            Category::Ingredient => &self.ingredients,
            Category::Cuisine => &self.cuisines,
            Category::CookingMethod => &self.cooking_methods,
        }
    }

    fn ratings_mut(&mut self, category: Category) -> &mut BTreeMap<String, Rating> {
        match category {
            Category::Ingredient => &mut self.ingredients,
            Category::Cuisine => &mut self.cuisines,
            Category::CookingMethod => &mut self.cooking_methods,
        }
    }

    /// Stored rating for `key`, if any. The key is normalized first.
    pub fn rating(&self, category: Category, key: &str) -> Option<Rating> {
        self.ratings(category).get(&normalize_key(key)).copied()
    }

    /// Keys rated +1 or +2, in key order.
    pub fn liked(&self, category: Category) -> Vec<&str> {
        self.ratings(category)
            .iter()
            .filter(|(_, r)| r.value() > 0)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Keys rated -1 or -2, in key order.
    pub fn disliked(&self, category: Category) -> Vec<&str> {
        self.ratings(category)
            .iter()
            .filter(|(_, r)| r.value() < 0)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn needs_setup(&self) -> bool {
        !self.setup_completed
    }

    /// Set or clear a rating. Neutral removes the entry; anything else overwrites.
    pub fn set_rating(
        &mut self,
        category: Category,
        key: &str,
        rating: Rating,
    ) -> Result<(), ValidationError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(ValidationError::EmptyKey { category });
        }
        let map = self.ratings_mut(category);
        if rating.is_neutral() {
            map.remove(&key);
        } else {
            map.insert(key, rating);
        }
        Ok(())
    }

    /// Apply a partial macro update. All fields are checked before any is written.
    pub fn update_macro_targets(&mut self, update: &MacroUpdate) -> Result<(), ValidationError> {
        let calories = update.calories.resolve("calories")?;
        let protein = update.protein_g.resolve("protein_g")?;
        let carbs = update.carbs_g.resolve("carbs_g")?;
        let fat = update.fat_g.resolve("fat_g")?;

        let targets = &mut self.macro_targets;
        for (slot, change) in [
            (&mut targets.calories, calories),
            (&mut targets.protein_g, protein),
            (&mut targets.carbs_g, carbs),
            (&mut targets.fat_g, fat),
        ] {
            if let Some(value) = change {
                *slot = value;
            }
        }
        Ok(())
    }

    /// Union `add`, then subtract `remove`. A key in both ends up absent.
    pub fn update_dietary_restrictions<A, R>(&mut self, add: A, remove: R)
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        for item in add {
            let key = normalize_key(item.as_ref());
            if !key.is_empty() {
                self.dietary_restrictions.insert(key);
            }
        }
        for item in remove {
            self.dietary_restrictions
                .remove(&normalize_key(item.as_ref()));
        }
    }

    pub fn complete_setup(&mut self) {
        self.setup_completed = true;
    }

    /// Re-establish invariants on data read from outside: drop neutral
    /// ratings and fold keys into their normalized form.
    pub(crate) fn normalize(&mut self) {
        for category in Category::ALL {
            let map = self.ratings_mut(category);
            let entries = std::mem::take(map);
            for (key, rating) in entries {
                let key = normalize_key(&key);
                if !rating.is_neutral() && !key.is_empty() {
                    map.insert(key, rating);
                }
            }
        }
        let restrictions = std::mem::take(&mut self.dietary_restrictions);
        self.update_dietary_restrictions(restrictions, std::iter::empty::<&str>());
    }
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: i64) -> Rating {
        Rating::new("test", v).unwrap()
    }

    #[test]
    fn new_profile_is_empty() {
        let profile = PreferenceProfile::new();
        for category in Category::ALL {
            assert!(profile.ratings(category).is_empty());
        }
        assert!(profile.dietary_restrictions.is_empty());
        assert_eq!(profile.macro_targets, MacroTargets::default());
        assert!(profile.needs_setup());
        assert_eq!(profile.version, PROFILE_VERSION);
    }

    #[test]
    fn category_parse() {
        assert_eq!("ingredient".parse::<Category>(), Ok(Category::Ingredient));
        assert_eq!(" cuisine ".parse::<Category>(), Ok(Category::Cuisine));
        assert_eq!(
            "cooking_method".parse::<Category>(),
            Ok(Category::CookingMethod)
        );
        assert_eq!(
            "dessert".parse::<Category>(),
            Err(ValidationError::InvalidCategory {
                value: "dessert".into()
            })
        );
    }

    #[test]
    fn rating_bounds() {
        for v in -2..=2 {
            assert_eq!(i64::from(rating(v)), v);
        }
        assert!(matches!(
            Rating::new("olives", 3),
            Err(ValidationError::RatingOutOfRange { value: 3, .. })
        ));
        assert!(Rating::new("olives", -3).is_err());
        assert!(Rating::new("olives", i64::MIN).is_err());
    }

    #[test]
    fn rating_labels() {
        assert_eq!(Rating::STRONGLY_DISLIKE.label(), "strongly dislike");
        assert_eq!(Rating::DISLIKE.label(), "dislike");
        assert_eq!(Rating::NEUTRAL.label(), "neutral");
        assert_eq!(Rating::LIKE.label(), "like");
        assert_eq!(Rating::LOVE.label(), "love");
        assert_eq!(Rating::LIKE.to_string(), "+1");
        assert_eq!(Rating::DISLIKE.to_string(), "-1");
    }

    #[test]
    fn set_rating_normalizes_key() {
        let mut profile = PreferenceProfile::new();
        profile
            .set_rating(Category::Cuisine, "  Mexican ", Rating::LOVE)
            .unwrap();
        assert_eq!(profile.cuisines.get("mexican"), Some(&Rating::LOVE));
        assert_eq!(
            profile.rating(Category::Cuisine, "MEXICAN"),
            Some(Rating::LOVE)
        );
    }

    #[test]
    fn set_rating_last_write_wins() {
        let mut profile = PreferenceProfile::new();
        profile
            .set_rating(Category::Ingredient, "tofu", Rating::LOVE)
            .unwrap();
        profile
            .set_rating(Category::Ingredient, "Tofu", Rating::DISLIKE)
            .unwrap();
        assert_eq!(profile.ingredients.len(), 1);
        assert_eq!(profile.ingredients["tofu"], Rating::DISLIKE);
    }

    #[test]
    fn neutral_removes_entry() {
        let mut profile = PreferenceProfile::new();
        profile
            .set_rating(Category::CookingMethod, "air_fryer", Rating::LIKE)
            .unwrap();
        profile
            .set_rating(Category::CookingMethod, "air_fryer", Rating::NEUTRAL)
            .unwrap();
        assert!(profile.cooking_methods.is_empty());

        // Absent key: no-op.
        profile
            .set_rating(Category::CookingMethod, "grilling", Rating::NEUTRAL)
            .unwrap();
        assert!(profile.cooking_methods.is_empty());
    }

    #[test]
    fn empty_key_rejected() {
        let mut profile = PreferenceProfile::new();
        let before = profile.clone();
        assert_eq!(
            profile.set_rating(Category::Ingredient, "   ", Rating::LIKE),
            Err(ValidationError::EmptyKey {
                category: Category::Ingredient
            })
        );
        assert_eq!(profile, before);
    }

    #[test]
    fn liked_and_disliked() {
        let mut profile = PreferenceProfile::new();
        profile
            .set_rating(Category::Ingredient, "olives", rating(-2))
            .unwrap();
        profile
            .set_rating(Category::Ingredient, "avocado", rating(2))
            .unwrap();
        profile
            .set_rating(Category::Ingredient, "cilantro", rating(1))
            .unwrap();
        profile
            .set_rating(Category::Ingredient, "eggplant", rating(-1))
            .unwrap();
        assert_eq!(
            profile.liked(Category::Ingredient),
            vec!["avocado", "cilantro"]
        );
        assert_eq!(
            profile.disliked(Category::Ingredient),
            vec!["eggplant", "olives"]
        );
        assert!(profile.liked(Category::Cuisine).is_empty());
    }

    #[test]
    fn macro_partial_update_keeps_other_fields() {
        let mut profile = PreferenceProfile::new();
        profile.macro_targets.protein_g = Some(150);
        profile
            .update_macro_targets(&MacroUpdate {
                calories: FieldUpdate::Set(2000),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(profile.macro_targets.calories, Some(2000));
        assert_eq!(profile.macro_targets.protein_g, Some(150));
        assert_eq!(profile.macro_targets.carbs_g, None);
    }

    #[test]
    fn macro_clear_removes_field() {
        let mut profile = PreferenceProfile::new();
        profile.macro_targets.fat_g = Some(70);
        profile.macro_targets.carbs_g = Some(200);
        profile
            .update_macro_targets(&MacroUpdate {
                fat_g: FieldUpdate::Clear,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(profile.macro_targets.fat_g, None);
        assert_eq!(profile.macro_targets.carbs_g, Some(200));
    }

    #[test]
    fn macro_negative_rejected_without_partial_write() {
        let mut profile = PreferenceProfile::new();
        let err = profile
            .update_macro_targets(&MacroUpdate {
                calories: FieldUpdate::Set(1800),
                fat_g: FieldUpdate::Set(-5),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidMacroValue {
                field: "fat_g",
                value: -5
            }
        );
        assert_eq!(profile.macro_targets.calories, None);
    }

    #[test]
    fn restrictions_add_and_remove() {
        let mut profile = PreferenceProfile::new();
        profile.update_dietary_restrictions(["Dairy-Free", " vegan ", ""], Vec::<String>::new());
        assert_eq!(
            profile.dietary_restrictions.iter().collect::<Vec<_>>(),
            vec!["dairy-free", "vegan"]
        );

        profile.update_dietary_restrictions(["keto"], ["VEGAN", "halal"]);
        assert_eq!(
            profile.dietary_restrictions.iter().collect::<Vec<_>>(),
            vec!["dairy-free", "keto"]
        );
    }

    #[test]
    fn restrictions_remove_wins() {
        let mut profile = PreferenceProfile::new();
        profile.update_dietary_restrictions(["Gluten-Free"], ["gluten-free "]);
        assert!(profile.dietary_restrictions.is_empty());
    }

    #[test]
    fn complete_setup_idempotent() {
        let mut profile = PreferenceProfile::new();
        profile.complete_setup();
        profile.complete_setup();
        assert!(profile.setup_completed);
        assert!(!profile.needs_setup());
    }

    #[test]
    fn yaml_round_trip() {
        let mut profile = PreferenceProfile::new();
        profile
            .set_rating(Category::Cuisine, "thai", Rating::LOVE)
            .unwrap();
        profile
            .set_rating(Category::Ingredient, "mushrooms", Rating::STRONGLY_DISLIKE)
            .unwrap();
        profile.update_dietary_restrictions(["nut-free"], Vec::<String>::new());
        profile.macro_targets.calories = Some(2200);
        profile.complete_setup();

        let yaml = serde_yaml::to_string(&profile).unwrap();
        let restored: PreferenceProfile = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(profile, restored);
    }

    #[test]
    fn yaml_rejects_out_of_scale_rating() {
        let yaml = "cuisines:\n  thai: 5\n";
        assert!(serde_yaml::from_str::<PreferenceProfile>(yaml).is_err());
    }

    #[test]
    fn normalize_drops_neutral_and_folds_keys() {
        let yaml = "cuisines:\n  Thai: 2\n  greek: 0\ndietary_restrictions:\n  - ' Vegan'\n";
        let mut profile: PreferenceProfile = serde_yaml::from_str(yaml).unwrap();
        profile.normalize();
        assert_eq!(profile.cuisines.len(), 1);
        assert_eq!(profile.cuisines["thai"], Rating::LOVE);
        assert!(profile.dietary_restrictions.contains("vegan"));
    }
}

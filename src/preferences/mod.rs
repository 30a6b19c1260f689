//! Preference profile — rated ingredients, cuisines and cooking methods,
//! dietary restrictions and macro targets, behind a locked store handle.
//!
//! Every mutation validates its input before touching state and hands back
//! the complete new profile together with the outcome of persisting it.

pub mod persistence;
pub mod profile;
pub mod questions;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::{StorageError, ValidationError};
use crate::history::SuggestedDelta;

pub use persistence::{
    default_profile_path, load_profile, reset_profile, save_profile, MemoryStorage,
    ProfileStorage, YamlFileStorage,
};
pub use profile::{
    normalize_key, Category, FieldUpdate, MacroTargets, MacroUpdate, PreferenceProfile, Rating,
};
pub use questions::{known_cuisines, setup_questions, QuestionKind, QuestionOption, SetupQuestion};

/// Result of a successful mutation: the full snapshot plus whether it was persisted.
///
/// A storage failure does not undo the in-memory change; callers decide how to
/// surface it.
#[derive(Debug)]
pub struct Mutation {
    pub profile: PreferenceProfile,
    pub persisted: Result<(), StorageError>,
}

impl Mutation {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn into_profile(self) -> PreferenceProfile {
        self.profile
    }
}

/// Owns the in-memory profile for one user and writes through to storage.
///
/// Construct once at startup, share by reference (or `Arc`), and call
/// [`close`](Self::close) on shutdown for a final flush.
///
/// Saves run under the profile lock, so writes to storage are serialized
/// and a slow backend delays other mutations.
pub struct PreferenceStore {
    profile: Mutex<PreferenceProfile>,
    storage: Box<dyn ProfileStorage>,
}

impl PreferenceStore {
    /// Load the current profile from `storage`.
    pub fn open(storage: impl ProfileStorage + 'static) -> Result<Self, StorageError> {
        let profile = storage.load()?;
        debug!(
            ingredients = profile.ingredients.len(),
            cuisines = profile.cuisines.len(),
            cooking_methods = profile.cooking_methods.len(),
            "loaded preference profile"
        );
        Ok(Self {
            profile: Mutex::new(profile),
            storage: Box::new(storage),
        })
    }

    /// Open the YAML profile at the default location.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(YamlFileStorage::default())
    }

    fn lock(&self) -> MutexGuard<'_, PreferenceProfile> {
        // Mutations only assign fully validated snapshots, so a poisoned
        // guard still holds a consistent profile.
        self.profile.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current profile.
    pub fn get_profile(&self) -> PreferenceProfile {
        self.lock().clone()
    }

    fn mutate<F>(&self, op: &'static str, f: F) -> Result<Mutation, ValidationError>
    where
        F: FnOnce(&mut PreferenceProfile) -> Result<(), ValidationError>,
    {
        let mut guard = self.lock();
        let mut next = guard.clone();
        f(&mut next)?;
        Ok(self.commit(op, &mut guard, next))
    }

    /// Install `next` and write it through while the lock is held.
    fn commit(
        &self,
        op: &'static str,
        guard: &mut MutexGuard<'_, PreferenceProfile>,
        next: PreferenceProfile,
    ) -> Mutation {
        **guard = next.clone();
        let persisted = self.storage.save(&next);
        if let Err(e) = &persisted {
            warn!(op, error = %e, "profile updated in memory but not persisted");
        }
        Mutation {
            profile: next,
            persisted,
        }
    }

    /// Rate `key` in `category`. A rating of 0 removes the entry.
    pub fn update_preference(
        &self,
        category: &str,
        key: &str,
        rating: i64,
    ) -> Result<Mutation, ValidationError> {
        let category: Category = category.parse()?;
        let rating = Rating::new(key, rating)?;
        let result = self.mutate("update_preference", |p| p.set_rating(category, key, rating))?;
        info!(%category, key = %normalize_key(key), %rating, "preference updated");
        Ok(result)
    }

    pub fn update_macro_targets(&self, update: &MacroUpdate) -> Result<Mutation, ValidationError> {
        let result = self.mutate("update_macro_targets", |p| p.update_macro_targets(update))?;
        info!(targets = ?result.profile.macro_targets, "macro targets updated");
        Ok(result)
    }

    pub fn update_dietary_restrictions<A, R>(&self, add: A, remove: R) -> Mutation
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut guard = self.lock();
        let mut next = guard.clone();
        next.update_dietary_restrictions(add, remove);
        let result = self.commit("update_dietary_restrictions", &mut guard, next);
        info!(restrictions = ?result.profile.dietary_restrictions, "dietary restrictions updated");
        result
    }

    /// Mark the setup questionnaire as done. Idempotent.
    pub fn complete_setup(&self) -> Mutation {
        let mut guard = self.lock();
        let mut next = guard.clone();
        next.complete_setup();
        self.commit("complete_setup", &mut guard, next)
    }

    /// Apply one reviewed suggestion from a history analysis.
    pub fn apply_suggestion(&self, delta: &SuggestedDelta) -> Result<Mutation, ValidationError> {
        let result = self.mutate("apply_suggestion", |p| {
            p.set_rating(delta.category, &delta.key, delta.suggested_rating)
        })?;
        info!(
            category = %delta.category,
            key = %delta.key,
            rating = %delta.suggested_rating,
            "suggestion applied"
        );
        Ok(result)
    }

    /// Replace the profile with an empty one and discard the persisted copy.
    pub fn reset(&self) -> Mutation {
        let mut guard = self.lock();
        *guard = PreferenceProfile::new();
        let persisted = self.storage.discard();
        if let Err(e) = &persisted {
            warn!(error = %e, "profile reset in memory but persisted copy remains");
        }
        info!("preference profile reset");
        Mutation {
            profile: guard.clone(),
            persisted,
        }
    }

    /// Write the current profile to storage.
    pub fn flush(&self) -> Result<(), StorageError> {
        let guard = self.lock();
        self.storage.save(&guard)
    }

    /// Final flush before the store is dropped.
    pub fn close(self) -> Result<(), StorageError> {
        self.flush()
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("profile", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> PreferenceStore {
        PreferenceStore::open(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn new_store_has_empty_profile() {
        let store = store();
        assert_eq!(store.get_profile(), PreferenceProfile::new());
    }

    #[test]
    fn update_returns_full_profile() {
        let store = store();
        store.update_preference("cuisine", "Thai", 2).unwrap();
        let m = store.update_preference("ingredient", "olives", -1).unwrap();
        assert!(m.is_persisted());
        assert_eq!(m.profile.cuisines["thai"], Rating::LOVE);
        assert_eq!(m.profile.ingredients["olives"], Rating::DISLIKE);
        assert_eq!(m.profile, store.get_profile());
    }

    #[test]
    fn update_is_idempotent() {
        let store = store();
        let first = store.update_preference("cooking_method", "grilling", 1).unwrap();
        let second = store.update_preference("cooking_method", "grilling", 1).unwrap();
        assert_eq!(first.profile, second.profile);
        assert_eq!(second.profile.cooking_methods.len(), 1);
    }

    #[test]
    fn invalid_category_rejected() {
        let store = store();
        let err = store.update_preference("dessert", "pie", 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCategory {
                value: "dessert".into()
            }
        );
    }

    #[test]
    fn out_of_range_rating_leaves_profile_untouched() {
        let store = store();
        store.update_preference("cuisine", "greek", 1).unwrap();
        let before = serde_yaml::to_string(&store.get_profile()).unwrap();

        for bad in [3, -3, 100] {
            let err = store.update_preference("cuisine", "greek", bad).unwrap_err();
            assert_eq!(
                err,
                ValidationError::RatingOutOfRange {
                    field: "greek".into(),
                    value: bad
                }
            );
        }

        let after = serde_yaml::to_string(&store.get_profile()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn mutations_write_through_to_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = PreferenceStore::open(Arc::clone(&storage)).unwrap();
        store.update_dietary_restrictions(["halal"], Vec::<String>::new());
        assert!(storage
            .snapshot()
            .unwrap()
            .dietary_restrictions
            .contains("halal"));

        store.complete_setup();
        assert!(storage.snapshot().unwrap().setup_completed);
    }

    #[test]
    fn apply_suggestion_sets_rating() {
        let store = store();
        let delta = SuggestedDelta {
            category: Category::Cuisine,
            key: "mexican".into(),
            suggested_rating: Rating::LIKE,
            rationale: "test".into(),
        };
        let m = store.apply_suggestion(&delta).unwrap();
        assert_eq!(m.profile.rating(Category::Cuisine, "mexican"), Some(Rating::LIKE));
    }

    #[test]
    fn reset_clears_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let store = PreferenceStore::open(Arc::clone(&storage)).unwrap();
        store.update_preference("ingredient", "tofu", 2).unwrap();
        let m = store.reset();
        assert!(m.is_persisted());
        assert_eq!(m.profile, PreferenceProfile::new());
        assert!(storage.snapshot().is_none());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        store
                            .update_preference("ingredient", &format!("item-{i}-{j}"), 1)
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.get_profile().ingredients.len(), 200);
    }
}

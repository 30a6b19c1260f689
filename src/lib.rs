//! PrepWise — meal-planning preference engine.
//!
//! A rated taste profile (ingredients, cuisines, cooking methods, dietary
//! restrictions, macro targets) and a history analyzer that proposes rating
//! changes from past recipe ratings.

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod preferences;

pub use error::{StorageError, ValidationError};

//! Arcanum Engine library.
//!
//! Loads rulesets and label catalogs and runs spell slot preparation and
//! rest recovery for actors.
//!
//! ## Structure
//!
//! - `entities/` - Actor data as stored and exchanged
//! - `use_cases/` - Slot preparation and rest recovery
//! - `infrastructure/` - File loading and environment settings
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;

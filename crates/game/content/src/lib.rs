//! Data-driven content for the outcome engine.
//!
//! This crate reads the static game content the engine resolves against:
//! - Item catalogs (data-driven via RON)
//! - Quality and trait definitions (data-driven via RON)
//! - Abilities, passives and monsters (data-driven via RON)
//! - Recipes and drop tables (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Everything is assembled into one immutable [`outcome_core::Catalog`] at
//! startup. The engine itself never touches the filesystem.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentFactory, DropTableLoader, ItemLoader, LoadResult,
    MonsterLoader, QualityLoader, RecipeLoader, TraitLoader,
};

/// Directory of the content shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

// src/config/mod.rs

//! Configuration loading, modelling, and validation.
//!
//! - [`model`] maps the TOML file structure.
//! - [`loader`] reads and deserializes the file.
//! - [`validate`] enforces the semantic invariants the engine relies on.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{parse_duration, ConfigFile, TimingSection, WatchSection};
pub use validate::validate_config;

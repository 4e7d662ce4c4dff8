//! Project configuration (`.pvault.toml`).

pub mod settings;

pub use settings::Settings;

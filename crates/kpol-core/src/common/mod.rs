pub mod config;
pub mod constants;
pub mod masses;

pub use config::{DispersionSettings, SettingsError, load_dispersion_settings};
pub use masses::{MassTable, kallen};

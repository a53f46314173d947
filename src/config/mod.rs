pub mod settings;

pub use settings::{AppConfig, LadderSettings, StorageSettings};

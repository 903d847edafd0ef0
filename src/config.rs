use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub player: String,                // report subject; --player overrides
    pub catalog_path: Option<PathBuf>, // external catalog; bundled one if unset
    pub batch_size: usize,             // games per parallel batch
    pub rayon_threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: String::new(),
            catalog_path: None,
            batch_size: 1000,
            rayon_threads: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        match std::fs::read_to_string("config.toml") {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }
}

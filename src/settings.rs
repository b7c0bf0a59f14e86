use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Backend {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Ui {
    pub high_budget_threshold: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionFile {
    pub file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub backend: Backend,
    pub ui: Ui,
    #[serde(default)]
    pub session: SessionFile,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("backend.url", "http://localhost:5000")?
            .set_default("ui.high_budget_threshold", 10_000.0)?
            .add_source(File::with_name(path).required(false))
            .build()?;

        config.try_deserialize()
    }
}

use std::path::Path;

use super::schema::VerifierConfig;
use crate::locate::FieldPath;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<VerifierConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<VerifierConfig, LoadError> {
    let cfg: VerifierConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub(crate) fn validate(cfg: &VerifierConfig) -> Result<FieldPath, LoadError> {
    if cfg.signature_field.trim().is_empty() {
        return Err(LoadError::Validation(
            "signature_field must not be empty".into(),
        ));
    }
    FieldPath::parse(&cfg.signature_field).ok_or_else(|| {
        LoadError::Validation(format!(
            "signature_field '{}' has an empty path segment",
            cfg.signature_field
        ))
    })
}

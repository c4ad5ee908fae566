use potsig_common::Escaping;
use serde::Deserialize;

use crate::locate::DEFAULT_SIGNATURE_FIELD;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VerifierConfig {
    #[serde(default = "default_signature_field")]
    pub signature_field: String,
    #[serde(default)]
    pub escaping: Escaping,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            signature_field: default_signature_field(),
            escaping: Escaping::default(),
        }
    }
}

fn default_signature_field() -> String {
    DEFAULT_SIGNATURE_FIELD.to_string()
}

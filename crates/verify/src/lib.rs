pub mod config;
mod locate;
mod secret_provider;
mod verifier;

pub use config::VerifierConfig;
pub use locate::{FieldPath, DEFAULT_SIGNATURE_FIELD};
pub use secret_provider::{ClientKey, SecretProvider, StaticSecretProvider, DEFAULT_KEY_ID};
pub use verifier::{verify_callback, Verifier, VerifyResult};

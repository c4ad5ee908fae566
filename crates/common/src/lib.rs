pub mod canonicalize;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod secret;
pub mod signature;

pub use canonicalize::{canonical_json, canonical_json_with, Escaping};
pub use error::SignatureError;
pub use payload::{Number, Payload};
pub use secret::Secret;
pub use signature::{compute_signature, Signer};

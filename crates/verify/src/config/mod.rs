mod loader;
mod schema;

pub(crate) use loader::validate;
pub use loader::{load_from_file, load_from_str, LoadError};
pub use schema::VerifierConfig;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Serialization(String),
    Encoding(String),
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization(msg) => write!(f, "serialization: {msg}"),
            Self::Encoding(msg) => write!(f, "encoding: {msg}"),
        }
    }
}

impl std::error::Error for SignatureError {}

impl From<std::str::Utf8Error> for SignatureError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for SignatureError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Encoding(e.utf8_error().to_string())
    }
}

impl serde::ser::Error for SignatureError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }
}

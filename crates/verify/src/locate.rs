use http::HeaderMap;
use serde_json::Value;

pub const DEFAULT_SIGNATURE_FIELD: &str = "x-pot-signature";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    chain: Vec<String>,
}

impl FieldPath {
    pub fn parse(field: &str) -> Option<Self> {
        let chain: Vec<String> = field
            .replace(']', "")
            .split('[')
            .map(|s| s.trim().to_string())
            .collect();
        if chain.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { chain })
    }

    pub fn segments(&self) -> &[String] {
        &self.chain
    }

    /// Walks the chain through nested objects. The first non-object value
    /// reached ends the walk; only a string counts as a signature.
    pub fn lookup<'a>(&self, source: &'a Value) -> Option<&'a str> {
        let mut current = source;
        for segment in &self.chain {
            let Value::Object(map) = current else {
                return None;
            };
            match map.get(segment)? {
                next @ Value::Object(_) => current = next,
                Value::String(s) => return Some(s),
                _ => return None,
            }
        }
        None
    }

    // Header maps are flat; the first segment names the header.
    pub fn lookup_header<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let name = self.chain.first()?;
        headers.get(name.as_str())?.to_str().ok()
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self {
            chain: vec![DEFAULT_SIGNATURE_FIELD.to_string()],
        }
    }
}

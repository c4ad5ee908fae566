use serde::Serialize;

use crate::canonicalize::{canonical_json_with, Escaping};
use crate::crypto::{sign_data, verify_signature};
use crate::error::SignatureError;
use crate::payload::Payload;
use crate::secret::Secret;

/// Signs `payload` with `secret` using the default (ASCII) escaping.
///
/// ```
/// use serde_json::json;
///
/// let sig = potsig_common::compute_signature(
///     &json!({"amount": 100, "currency": "USD"}),
///     "testsecret",
/// )
/// .unwrap();
/// assert_eq!(sig, "6dakTsObw0GDjkQSoufw/Y7GcpX4t3n6A0uE/X8Ptjo=");
/// ```
pub fn compute_signature<T: Serialize + ?Sized>(
    payload: &T,
    secret: &str,
) -> Result<String, SignatureError> {
    Signer::new(secret).sign(payload)
}

#[derive(Debug, Clone)]
pub struct Signer {
    secret: Secret,
    escaping: Escaping,
}

impl Signer {
    pub fn new(secret: impl Into<Secret>) -> Self {
        Self {
            secret: secret.into(),
            escaping: Escaping::default(),
        }
    }

    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignatureError> {
        Ok(Self::new(Secret::from_bytes(secret)?))
    }

    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn canonical_text<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, SignatureError> {
        canonical_json_with(&Payload::from_serialize(payload)?, self.escaping)
    }

    pub fn sign<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, SignatureError> {
        self.sign_payload(&Payload::from_serialize(payload)?)
    }

    pub fn sign_payload(&self, payload: &Payload) -> Result<String, SignatureError> {
        let text = canonical_json_with(payload, self.escaping)?;
        Ok(sign_data(self.secret.expose().as_bytes(), text.as_bytes()))
    }

    // Malformed base64 is a mismatch, not an error.
    pub fn verify<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        signature_b64: &str,
    ) -> Result<bool, SignatureError> {
        self.verify_payload(&Payload::from_serialize(payload)?, signature_b64)
    }

    pub fn verify_payload(&self, payload: &Payload, signature_b64: &str) -> Result<bool, SignatureError> {
        let text = canonical_json_with(payload, self.escaping)?;
        Ok(verify_signature(
            self.secret.expose().as_bytes(),
            text.as_bytes(),
            signature_b64.trim(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SIGNATURE_LEN;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn deterministic() {
        let body = json!({"amount": 100, "currency": "USD"});
        let a = compute_signature(&body, "testsecret").unwrap();
        let b = compute_signature(&body, "testsecret").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signature_shape() {
        let sig = compute_signature(&json!({"k": "v"}), "s").unwrap();
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(sig.ends_with('=') && !sig.ends_with("=="));
        assert!(sig[..43]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/'));
    }

    #[test]
    fn secret_changes_signature() {
        let body = json!({"amount": 100});
        assert_ne!(
            compute_signature(&body, "a").unwrap(),
            compute_signature(&body, "b").unwrap()
        );
    }

    #[test]
    fn nested_key_name_changes_signature() {
        let body = json!({"transaction": {"amount": 100}});
        let renamed = json!({"transaction": {"amount_": 100}});
        assert_ne!(
            compute_signature(&body, "testsecret").unwrap(),
            compute_signature(&renamed, "testsecret").unwrap()
        );
    }

    #[test]
    fn typed_and_untyped_payloads_agree() {
        #[derive(Serialize)]
        struct Body {
            currency: &'static str,
            amount: u32,
        }
        let typed = compute_signature(&Body { currency: "USD", amount: 100 }, "testsecret").unwrap();
        let untyped = compute_signature(&json!({"amount": 100, "currency": "USD"}), "testsecret").unwrap();
        assert_eq!(typed, untyped);
    }

    #[test]
    fn non_string_key_rejected() {
        let mut body = HashMap::new();
        body.insert(7, "seven");
        assert!(matches!(
            compute_signature(&body, "testsecret"),
            Err(SignatureError::Serialization(_))
        ));
    }

    #[test]
    fn verify_accepts_own_signature() {
        let signer = Signer::new("testsecret");
        let body = json!({"items": [{"id": 2}, {"id": 1}]});
        let sig = signer.sign(&body).unwrap();
        assert!(signer.verify(&body, &sig).unwrap());
        assert!(!signer.verify(&json!({"items": [{"id": 1}, {"id": 2}]}), &sig).unwrap());
        assert!(!signer.verify(&body, "not base64").unwrap());
    }

    #[test]
    fn escaping_mode_changes_signed_bytes() {
        let body = json!({"name": "café"});
        let ascii = Signer::new("k");
        let utf8 = Signer::new("k").with_escaping(Escaping::Utf8);
        assert_eq!(ascii.canonical_text(&body).unwrap(), r#"{"name": "caf\u00e9"}"#);
        assert_eq!(utf8.canonical_text(&body).unwrap(), r#"{"name": "café"}"#);
        assert_ne!(ascii.sign(&body).unwrap(), utf8.sign(&body).unwrap());
    }

    #[test]
    fn from_bytes_requires_utf8() {
        assert!(matches!(
            Signer::from_bytes(&[0xff, 0xfe]),
            Err(SignatureError::Encoding(_))
        ));
        let signer = Signer::from_bytes(b"testsecret").unwrap();
        assert_eq!(
            signer.sign(&json!({"a": 1})).unwrap(),
            compute_signature(&json!({"a": 1}), "testsecret").unwrap()
        );
    }
}

use http::HeaderMap;
use potsig_common::{Escaping, Payload, SignatureError, Signer};
use serde::Serialize;
use serde_json::Value;

use crate::config::{LoadError, VerifierConfig};
use crate::locate::FieldPath;
use crate::secret_provider::SecretProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Valid { key_id: String },
    Invalid,
    MissingSignature,
    UnknownClient,
}

impl VerifyResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn key_id(&self) -> Option<&str> {
        match self {
            Self::Valid { key_id } => Some(key_id),
            _ => None,
        }
    }
}

pub async fn verify_callback<T: Serialize + ?Sized>(
    provider: &dyn SecretProvider,
    client_id: &str,
    payload: &T,
    signature: Option<&str>,
    escaping: Escaping,
) -> Result<VerifyResult, SignatureError> {
    let Some(sig) = signature.map(str::trim).filter(|s| !s.is_empty()) else {
        tracing::warn!(client_id = %client_id, "missing signature");
        return Ok(VerifyResult::MissingSignature);
    };

    let payload = Payload::from_serialize(payload)?;

    let keys = provider.client_keys(client_id).await;
    if keys.is_empty() {
        tracing::warn!(client_id = %client_id, "no secret available for client");
        return Ok(VerifyResult::UnknownClient);
    }

    for key in &keys {
        let signer = Signer::from_bytes(&key.secret)?.with_escaping(escaping);
        if signer.verify_payload(&payload, sig)? {
            tracing::debug!(client_id = %client_id, key_id = %key.key_id, "signature verified");
            return Ok(VerifyResult::Valid {
                key_id: key.key_id.clone(),
            });
        }
    }

    tracing::warn!(client_id = %client_id, keys_tried = keys.len(), "signature mismatch");
    Ok(VerifyResult::Invalid)
}

pub struct Verifier<P> {
    config: VerifierConfig,
    field: FieldPath,
    provider: P,
}

impl<P: SecretProvider> Verifier<P> {
    pub fn new(config: VerifierConfig, provider: P) -> Result<Self, LoadError> {
        let field = crate::config::validate(&config)?;
        Ok(Self {
            config,
            field,
            provider,
        })
    }

    pub async fn authenticate_headers<T: Serialize + ?Sized>(
        &self,
        client_id: &str,
        headers: &HeaderMap,
        payload: &T,
    ) -> Result<VerifyResult, SignatureError> {
        let signature = self.field.lookup_header(headers);
        verify_callback(&self.provider, client_id, payload, signature, self.config.escaping).await
    }

    pub async fn authenticate_document<T: Serialize + ?Sized>(
        &self,
        client_id: &str,
        document: &Value,
        payload: &T,
    ) -> Result<VerifyResult, SignatureError> {
        let signature = self.field.lookup(document);
        verify_callback(&self.provider, client_id, payload, signature, self.config.escaping).await
    }
}

use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_KEY_ID: &str = "default";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientKey {
    pub key_id: String,
    pub secret: Vec<u8>,
}

impl ClientKey {
    pub fn new(key_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientKey")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Keys come back in priority order: the current key first, then any
/// retired keys still inside their grace period.
#[async_trait::async_trait]
pub trait SecretProvider: Send + Sync {
    async fn client_keys(&self, client_id: &str) -> Vec<ClientKey>;
}

#[derive(Clone, Default)]
pub struct StaticSecretProvider {
    keys: HashMap<String, Vec<ClientKey>>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, client_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        self.with_key(client_id, DEFAULT_KEY_ID, secret)
    }

    pub fn with_key(
        mut self,
        client_id: impl Into<String>,
        key_id: impl Into<String>,
        secret: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(client_id, ClientKey::new(key_id, secret));
        self
    }

    pub fn insert(&mut self, client_id: impl Into<String>, key: ClientKey) {
        let keys = self.keys.entry(client_id.into()).or_default();
        match keys.iter_mut().find(|k| k.key_id == key.key_id) {
            Some(existing) => *existing = key,
            None => keys.push(key),
        }
    }

    pub fn rotate(&mut self, client_id: impl Into<String>, key: ClientKey) {
        let keys = self.keys.entry(client_id.into()).or_default();
        keys.retain(|k| k.key_id != key.key_id);
        keys.insert(0, key);
    }

    pub fn retire(&mut self, client_id: &str, key_id: &str) -> bool {
        let Some(keys) = self.keys.get_mut(client_id) else {
            return false;
        };
        let before = keys.len();
        keys.retain(|k| k.key_id != key_id);
        let removed = keys.len() != before;
        if keys.is_empty() {
            self.keys.remove(client_id);
        }
        removed
    }

    pub fn remove(&mut self, client_id: &str) -> bool {
        self.keys.remove(client_id).is_some()
    }
}

impl fmt::Debug for StaticSecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut clients: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        clients.sort_unstable();
        f.debug_struct("StaticSecretProvider")
            .field("clients", &clients)
            .finish()
    }
}

#[async_trait::async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn client_keys(&self, client_id: &str) -> Vec<ClientKey> {
        self.keys.get(client_id).cloned().unwrap_or_default()
    }
}

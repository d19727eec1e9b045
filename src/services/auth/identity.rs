use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verified principal returned by an identity provider.
///
/// `user_id` is the provider's `id`; every other field of the provider's user
/// record is kept verbatim in `claims`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "id")]
    pub user_id: String,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

#[cfg(test)]
impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            claims: Map::new(),
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }
}

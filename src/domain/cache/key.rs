//! Cache key derivation

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::features::{NormalizedFeatures, Scalar};

type HmacSha256 = Hmac<Sha256>;

/// Default namespace prefixed to every prediction key
pub const DEFAULT_KEY_NAMESPACE: &str = "diabetes:infer";

/// Opaque, fixed-length key of a cached prediction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for deriving cache keys from a model identity and its input
pub trait CacheKeyGenerator: Send + Sync + fmt::Debug {
    /// Derives the key for a normalized input of the given model
    fn derive(
        &self,
        model_name: &str,
        model_version: &str,
        features: &NormalizedFeatures,
    ) -> CacheKey;

    /// Namespace all derived keys start with
    fn namespace(&self) -> &str;
}

// Field order is the sorted key order of the canonical form.
#[derive(Serialize)]
struct CanonicalKeyInput<'a> {
    features: &'a [Scalar],
    model: &'a str,
    version: &'a str,
}

/// Compact JSON of the key inputs, keys sorted, no whitespace
pub fn canonical_form(
    model_name: &str,
    model_version: &str,
    features: &NormalizedFeatures,
) -> String {
    let input = CanonicalKeyInput {
        features: features.values(),
        model: model_name,
        version: model_version,
    };

    serde_json::to_string(&input).expect("key input of strings and numbers always serializes")
}

/// Key generator computing HMAC-SHA256 over the canonical form
///
/// Keys cannot be computed from the inputs without the secret.
#[derive(Clone)]
pub struct HmacKeyGenerator {
    mac: HmacSha256,
    namespace: String,
}

impl fmt::Debug for HmacKeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKeyGenerator")
            .field("namespace", &self.namespace)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl HmacKeyGenerator {
    /// Creates a generator with the default namespace
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_namespace(secret, DEFAULT_KEY_NAMESPACE)
    }

    pub fn with_namespace(secret: impl AsRef<[u8]>, namespace: impl Into<String>) -> Self {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .expect("HMAC can take key of any size");

        Self {
            mac,
            namespace: namespace.into(),
        }
    }
}

impl CacheKeyGenerator for HmacKeyGenerator {
    fn derive(
        &self,
        model_name: &str,
        model_version: &str,
        features: &NormalizedFeatures,
    ) -> CacheKey {
        let blob = canonical_form(model_name, model_version, features);

        let mut mac = self.mac.clone();
        mac.update(blob.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());

        CacheKey(format!("{}:{}", self.namespace, digest))
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

use playlist_primitives::StorageUri;

const DEFAULT_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs";

/// Pinning-service configuration.
///
/// Credentials are optional by design: without them the system falls
/// back to mock uploads instead of failing (see
/// [`uploader_for`](crate::uploader_for)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: String,
    pub gateway: String,
}

impl StorageConfig {
    pub const API_KEY_ENV: &'static str = "PODS_PINNING_API_KEY";
    pub const SECRET_KEY_ENV: &'static str = "PODS_PINNING_SECRET_KEY";
    pub const ENDPOINT_ENV: &'static str = "PODS_PINNING_ENDPOINT";
    pub const GATEWAY_ENV: &'static str = "PODS_PINNING_GATEWAY";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment in production,
    /// a closure in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            api_key: non_empty(Self::API_KEY_ENV),
            secret_key: non_empty(Self::SECRET_KEY_ENV),
            endpoint: non_empty(Self::ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            gateway: non_empty(Self::GATEWAY_ENV).unwrap_or_else(|| DEFAULT_GATEWAY.to_string()),
        }
    }

    /// Both credentials present: real uploads are possible
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }

    /// HTTP gateway URL serving a content-addressed reference
    pub fn gateway_url(&self, uri: &StorageUri) -> String {
        format!("{}/{}", self.gateway.trim_end_matches('/'), uri.hash())
    }
}

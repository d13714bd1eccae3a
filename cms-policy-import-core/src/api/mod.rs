//! Admin API integration: authenticated HTTP client and connection settings.

pub(crate) mod client;

pub use client::CmsClient;

/// Connection settings for the target instance. The CLI fills these from
/// flags or their environment overrides.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

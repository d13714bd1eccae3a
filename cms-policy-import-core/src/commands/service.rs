//! Provisioning Service Layer
//!
//! This module provides the service interface that encapsulates provisioning
//! against a live instance. The service holds the authenticated API client
//! and offers high-level operations used by the CLI front end.

use log::info;

use crate::api::{CmsClient, ConnectionConfig};
use crate::error::ImportResult;

/// Service struct that holds the authenticated client and provides the
/// provisioning operations
pub struct ProvisionService {
    pub(crate) client: CmsClient,
}

impl ProvisionService {
    /// Authenticate against the target instance and create a service bound
    /// to the resulting session.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is unreachable or rejects the
    /// credentials; both are fatal to a provisioning run.
    pub async fn connect(config: &ConnectionConfig) -> ImportResult<Self> {
        let client = CmsClient::login(config).await?;
        info!("Authenticated as {}", config.email);
        Ok(Self { client })
    }

    // import() method implementation is in import.rs
}

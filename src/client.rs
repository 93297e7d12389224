//! Client entry point
//!
//! [`EhrClient`] ties a transport to the search configuration and hands out
//! one [`ResourceService`] per resource type.

use std::sync::Arc;

use crate::adapters::{HttpTransport, Transport};
use crate::config::{ConduitConfig, SearchConfig};
use crate::core::search::Paginator;
use crate::domain::Result;
use crate::resources::{catalog, Resource, ResourceService, ResourceType};

/// Entry point for searching a vendor API
///
/// # Example
///
/// ```no_run
/// use conduit::client::EhrClient;
/// use conduit::config::load_config;
/// use conduit::core::search::SearchParameters;
/// use conduit::domain::TenantId;
/// use conduit::resources::ResourceType;
///
/// # async fn example() -> conduit::domain::Result<()> {
/// let config = load_config("conduit.toml")?;
/// let client = EhrClient::from_config(&config)?;
/// let tenant = TenantId::new("acme").unwrap();
///
/// let conditions = client
///     .service(ResourceType::Condition)
///     .search(&tenant, &SearchParameters::new().with("patient", "12724066"))
///     .await?;
/// println!("{} conditions", conditions.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EhrClient {
    paginator: Paginator,
    search: SearchConfig,
}

impl EhrClient {
    /// Creates a client over any transport
    pub fn new(transport: Arc<dyn Transport>, search: SearchConfig) -> Self {
        Self {
            paginator: Paginator::from_config(transport, &search),
            search,
        }
    }

    /// Creates an HTTP-backed client from the loaded configuration
    ///
    /// # Errors
    ///
    /// Fails if an HTTP client can't be built for one of the tenants.
    pub fn from_config(config: &ConduitConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), config.search.clone()))
    }

    /// Service for `resource_type`, with any configured batch size override
    pub fn service(&self, resource_type: ResourceType) -> ResourceService<Resource> {
        let spec = catalog::spec(resource_type);
        let service = ResourceService::from_spec(self.paginator.clone(), spec);
        match self.search.batch_size_for(spec.name()) {
            Some(batch_size) => service.with_batch_size(batch_size),
            None => service,
        }
    }

    /// Shared paginator behind every service
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }
}

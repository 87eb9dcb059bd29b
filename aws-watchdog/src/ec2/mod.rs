pub mod client;
pub mod credentials;
pub mod resolver;

use crate::error::QueryError;

/// One instance as described by the provider
#[derive(Debug, Clone, Default)]
pub struct InstanceDescription {
    pub instance_id: Option<String>,
    pub tags: Vec<(String, String)>,
    pub private_ip: Option<String>,
}

impl InstanceDescription {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Instances launched together, as grouped by the provider
#[derive(Debug, Clone, Default)]
pub struct Reservation {
    pub instances: Vec<InstanceDescription>,
}

/// Describe-instances capability of the cloud provider.
pub trait InstanceSource {
    /// Every reservation holding instances whose `filter_name` matches `value`
    async fn describe(&self, filter_name: &str, value: &str) -> Result<Vec<Reservation>, QueryError>;
}

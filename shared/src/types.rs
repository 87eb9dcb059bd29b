use std::fmt;
use crate::protocol::{ENTITY_KEY_PREFIX, EVENT_CATEGORY_PREFIX};

/// A service declared in the watchdog catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Name used in event categories
    pub name: String,

    /// Value matched against the configured instance tag filter
    pub tag: String,

    /// TCP port probed on every matching instance
    pub port: u16,
}

/// A live instance backing a service, ready to be probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstance {
    /// Name of the owning ServiceDefinition
    pub service_name: String,

    /// Value of the instance "Name" tag, empty if absent
    pub display_name: String,

    /// `private_ip:port`
    pub address: String,
}

impl ResolvedInstance {
    pub fn new(service: &ServiceDefinition, display_name: impl Into<String>, private_ip: &str) -> Self {
        Self {
            service_name: service.name.clone(),
            display_name: display_name.into(),
            address: format!("{}:{}", private_ip, service.port),
        }
    }

    /// Key of the monitoring entity an outage is reported against
    pub fn entity_key(&self) -> String {
        format!("{}{}", ENTITY_KEY_PREFIX, self.display_name)
    }

    /// Category of the outage event
    pub fn event_category(&self) -> String {
        format!("{}{}", EVENT_CATEGORY_PREFIX, self.service_name)
    }

    /// Summary of the outage event
    pub fn outage_summary(&self) -> String {
        format!("Service on {} not responding", self.display_name)
    }
}

/// Outcome of one reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Reachable => f.write_str("reachable"),
            ProbeOutcome::Unreachable => f.write_str("unreachable"),
        }
    }
}

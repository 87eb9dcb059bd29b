use shared::protocol::NAME_TAG;
use shared::types::{ResolvedInstance, ServiceDefinition};
use crate::ec2::{InstanceSource, Reservation};
use crate::error::QueryError;

/// Result of resolving one service, keeping "no instances" apart from "lookup failed"
#[derive(Debug)]
pub enum ServiceResolution {
    Resolved(Vec<ResolvedInstance>),
    Failed(QueryError),
}

/// Resolves service definitions to live instances via an InstanceSource
pub struct InstanceResolver<S> {
    source: S,
    tag_name: String,
}

impl<S: InstanceSource> InstanceResolver<S> {
    pub fn new(source: S, tag_name: impl Into<String>) -> Self {
        Self {
            source,
            tag_name: tag_name.into(),
        }
    }

    /// Resolve a single service. Every reservation group is consumed.
    pub async fn resolve(&self, service: &ServiceDefinition) -> ServiceResolution {
        match self.source.describe(&self.tag_name, &service.tag).await {
            Ok(reservations) => {
                let instances = collect_instances(service, &reservations);
                tracing::debug!(
                    "Service {} ({}={}) resolved to {} instance(s)",
                    service.name,
                    self.tag_name,
                    service.tag,
                    instances.len()
                );
                ServiceResolution::Resolved(instances)
            }
            Err(e) => {
                tracing::warn!("Failed to resolve instances for service {}: {}", service.name, e);
                ServiceResolution::Failed(e)
            }
        }
    }

    /// Resolve every service in order, one lookup per service
    pub async fn resolve_all(&self, services: &[ServiceDefinition]) -> Vec<(ServiceDefinition, ServiceResolution)> {
        let mut resolutions = Vec::with_capacity(services.len());
        for service in services {
            let resolution = self.resolve(service).await;
            resolutions.push((service.clone(), resolution));
        }
        resolutions
    }
}

fn collect_instances(service: &ServiceDefinition, reservations: &[Reservation]) -> Vec<ResolvedInstance> {
    reservations
        .iter()
        .flat_map(|reservation| reservation.instances.iter())
        .filter_map(|instance| {
            let Some(private_ip) = instance.private_ip.as_deref().filter(|ip| !ip.is_empty()) else {
                tracing::debug!(
                    "Skipping instance {} of service {} - no private address",
                    instance.instance_id.as_deref().unwrap_or("<unknown>"),
                    service.name
                );
                return None;
            };
            let display_name = instance.tag(NAME_TAG).unwrap_or_default();
            Some(ResolvedInstance::new(service, display_name, private_ip))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::fixtures::{instance, StaticSource};

    fn service(name: &str, tag: &str, port: u16) -> ServiceDefinition {
        ServiceDefinition {
            name: name.to_string(),
            tag: tag.to_string(),
            port,
        }
    }

    #[tokio::test]
    async fn test_resolves_every_reservation() {
        let source = StaticSource::default().with(
            "svc-web",
            vec![
                Reservation { instances: vec![instance(Some("web-1"), Some("10.0.0.5"))] },
                Reservation { instances: vec![instance(Some("web-2"), Some("10.0.0.6"))] },
            ],
        );
        let resolver = InstanceResolver::new(source, "tag:Service");

        let ServiceResolution::Resolved(instances) = resolver.resolve(&service("web", "svc-web", 80)).await else {
            panic!("expected resolved instances");
        };

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].display_name, "web-1");
        assert_eq!(instances[0].address, "10.0.0.5:80");
        assert_eq!(instances[1].address, "10.0.0.6:80");
        assert!(instances.iter().all(|i| i.service_name == "web"));
    }

    #[tokio::test]
    async fn test_missing_name_and_address() {
        let source = StaticSource::default().with(
            "svc-api",
            vec![Reservation {
                instances: vec![instance(None, Some("10.0.1.1")), instance(Some("detached"), None)],
            }],
        );
        let resolver = InstanceResolver::new(source, "tag:Service");

        let ServiceResolution::Resolved(instances) = resolver.resolve(&service("api", "svc-api", 8080)).await else {
            panic!("expected resolved instances");
        };

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].display_name, "");
        assert_eq!(instances[0].address, "10.0.1.1:8080");
    }

    #[tokio::test]
    async fn test_query_failure_is_distinct_from_empty() {
        let source = StaticSource::default().failing("svc-db");
        let resolver = InstanceResolver::new(source, "tag:Service");

        let resolutions = resolver
            .resolve_all(&[service("db", "svc-db", 5432), service("cache", "svc-cache", 6379)])
            .await;

        assert!(matches!(resolutions[0].1, ServiceResolution::Failed(_)));
        assert!(matches!(&resolutions[1].1, ServiceResolution::Resolved(v) if v.is_empty()));
    }
}

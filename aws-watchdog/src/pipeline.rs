use std::time::Duration;
use shared::types::{ProbeOutcome, ServiceDefinition};
use crate::ec2::resolver::{InstanceResolver, ServiceResolution};
use crate::ec2::InstanceSource;
use crate::probe;
use crate::report::{self, integration::Integration};

/// Probe settings for one run
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub concurrency: usize,
}

/// Counters for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub services: usize,
    pub failed_queries: usize,
    pub instances: usize,
    pub unreachable: usize,
    pub report_errors: usize,
}

/// Resolve, probe and report every service once.
///
/// Per-service lookup failures and per-instance report failures are logged
/// and counted; the run always continues with the remaining work.
pub async fn run<S: InstanceSource>(
    resolver: &InstanceResolver<S>,
    services: &[ServiceDefinition],
    settings: ProbeSettings,
    integration: &mut Integration,
) -> RunSummary {
    let mut summary = RunSummary {
        services: services.len(),
        ..Default::default()
    };

    let mut instances = Vec::new();
    for (_, resolution) in resolver.resolve_all(services).await {
        match resolution {
            ServiceResolution::Resolved(resolved) => instances.extend(resolved),
            ServiceResolution::Failed(_) => summary.failed_queries += 1,
        }
    }
    summary.instances = instances.len();

    let results = probe::probe_all(instances, settings.timeout, settings.concurrency).await;

    for (instance, outcome) in results {
        if outcome == ProbeOutcome::Reachable {
            continue;
        }
        summary.unreachable += 1;
        if let Err(e) = report::report_outage(integration, &instance) {
            tracing::error!("Failed to report outage of {}: {}", instance.address, e);
            summary.report_errors += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;
    use crate::catalog::parse_catalog;
    use crate::ec2::fixtures::{instance, StaticSource};
    use crate::ec2::Reservation;

    fn settings() -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(2),
            concurrency: 2,
        }
    }

    fn web_catalog(port: u16) -> Vec<ServiceDefinition> {
        parse_catalog(&json!({
            "web": [{"name": "web", "tag": "svc-web", "port": port.to_string()}]
        }))
        .unwrap()
    }

    fn loopback_source() -> StaticSource {
        StaticSource::default().with(
            "svc-web",
            vec![Reservation { instances: vec![instance(Some("web-1"), Some("127.0.0.1"))] }],
        )
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_unreachable_instance_produces_one_event() {
        let resolver = InstanceResolver::new(loopback_source(), "tag:Service");
        let services = web_catalog(closed_port().await);
        let mut integration = Integration::default();

        let summary = run(&resolver, &services, settings(), &mut integration).await;

        assert_eq!(summary.instances, 1);
        assert_eq!(summary.unreachable, 1);
        assert_eq!(integration.data.len(), 1);

        let entity = &integration.data[0];
        assert_eq!(entity.metadata.name, "app-statusweb-1");
        assert_eq!(entity.metadata.entity_type, "acme.safeassign.health");
        assert_eq!(entity.events.len(), 1);
        assert_eq!(entity.events[0].category, "app-status-web");
        assert!(entity.events[0].summary.contains("web-1"));
    }

    #[tokio::test]
    async fn test_reachable_instance_produces_no_event() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let resolver = InstanceResolver::new(loopback_source(), "tag:Service");
        let mut integration = Integration::default();

        let summary = run(&resolver, &web_catalog(port), settings(), &mut integration).await;

        assert_eq!(summary.instances, 1);
        assert_eq!(summary.unreachable, 0);
        assert_eq!(integration.event_count(), 0);
        assert!(integration.data.is_empty());
    }

    #[tokio::test]
    async fn test_service_without_instances_or_failing_lookup() {
        let source = StaticSource::default().failing("svc-db");
        let resolver = InstanceResolver::new(source, "tag:Service");
        let services = parse_catalog(&json!({
            "web": [{"name": "web", "tag": "svc-web", "port": "80"}],
            "db": [{"name": "db", "tag": "svc-db", "port": "5432"}]
        }))
        .unwrap();
        let mut integration = Integration::default();

        let summary = run(&resolver, &services, settings(), &mut integration).await;

        assert_eq!(
            summary,
            RunSummary {
                services: 2,
                failed_queries: 1,
                ..Default::default()
            }
        );
        assert!(integration.data.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let resolver = InstanceResolver::new(loopback_source(), "tag:Service");
        let services = web_catalog(closed_port().await);

        let mut payloads = Vec::new();
        for _ in 0..2 {
            let mut integration = Integration::default();
            run(&resolver, &services, settings(), &mut integration).await;
            let mut out = Vec::new();
            integration.publish(&mut out, false).unwrap();
            payloads.push(out);
        }

        assert_eq!(payloads[0], payloads[1]);
    }
}

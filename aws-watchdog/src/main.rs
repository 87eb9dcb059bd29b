mod catalog;
mod config;
mod ec2;
mod error;
mod pipeline;
mod probe;
mod report;

use anyhow::{Context, Result};
use crate::config::Config;
use crate::ec2::client::Ec2InstanceSource;
use crate::ec2::resolver::InstanceResolver;
use crate::pipeline::ProbeSettings;
use crate::report::integration::Integration;

const DEFAULT_CONFIG_PATH: &str = "/etc/newrelic-infra/integrations.d/aws-watchdog.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    // Initialize tracing; stdout is reserved for the payload
    let default_filter = if config.output.verbose {
        "aws_watchdog=debug"
    } else {
        "aws_watchdog=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
        )
        .init();

    tracing::info!("Loaded config from {}", config_path);

    let mut integration = Integration::default();

    if config.output.events {
        let services = catalog::parse_catalog(&config.catalog_value()?)
            .context("Invalid service catalog")?;
        tracing::info!("Watching {} service(s)", services.len());

        let source = Ec2InstanceSource::connect(&config.aws).await?;
        let resolver = InstanceResolver::new(source, config.aws.tag_name.clone());

        let settings = ProbeSettings {
            timeout: config.probe.timeout()?,
            concurrency: config.probe.concurrency,
        };

        let summary = pipeline::run(&resolver, &services, settings, &mut integration).await;

        tracing::info!(
            "Checked {} instance(s) across {} service(s): {} unreachable",
            summary.instances,
            summary.services,
            summary.unreachable
        );
        if summary.failed_queries > 0 || summary.report_errors > 0 {
            tracing::warn!(
                "Run completed with {} failed lookup(s) and {} report error(s)",
                summary.failed_queries,
                summary.report_errors
            );
        }
    } else {
        tracing::info!("Event collection disabled, publishing empty payload");
    }

    integration
        .publish(std::io::stdout().lock(), config.output.pretty)
        .context("Failed to publish to the infrastructure agent")?;

    Ok(())
}

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Filter;
use crate::config::AwsConfig;
use crate::ec2::{credentials, InstanceDescription, InstanceSource, Reservation};
use crate::error::QueryError;

/// InstanceSource backed by the EC2 DescribeInstances API
pub struct Ec2InstanceSource {
    client: aws_sdk_ec2::Client,
}

impl Ec2InstanceSource {
    /// Build the credential chain and EC2 client for the configured region.
    ///
    /// Credentials are resolved once here so a missing or invalid identity
    /// aborts the run before any lookup.
    pub async fn connect(config: &AwsConfig) -> Result<Self> {
        let chain = credentials::provider_chain(config.profile());

        chain
            .provide_credentials()
            .await
            .context("Failed to resolve AWS credentials")?;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(chain)
            .load()
            .await;

        tracing::info!("EC2 client ready for region {}", config.region);

        Ok(Self {
            client: aws_sdk_ec2::Client::new(&sdk_config),
        })
    }
}

impl InstanceSource for Ec2InstanceSource {
    async fn describe(&self, filter_name: &str, value: &str) -> Result<Vec<Reservation>, QueryError> {
        let filter = Filter::builder().name(filter_name).values(value).build();

        let pages = self
            .client
            .describe_instances()
            .filters(filter)
            .into_paginator()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| QueryError::Describe(DisplayErrorContext(&e).to_string()))?;

        let reservations = pages
            .iter()
            .flat_map(|page| page.reservations())
            .map(convert_reservation)
            .collect();

        Ok(reservations)
    }
}

fn convert_reservation(reservation: &aws_sdk_ec2::types::Reservation) -> Reservation {
    let instances = reservation
        .instances()
        .iter()
        .map(|instance| InstanceDescription {
            instance_id: instance.instance_id().map(str::to_string),
            tags: instance
                .tags()
                .iter()
                .filter_map(|tag| Some((tag.key()?.to_string(), tag.value().unwrap_or_default().to_string())))
                .collect(),
            private_ip: instance.private_ip_address().map(str::to_string),
        })
        .collect();

    Reservation { instances }
}

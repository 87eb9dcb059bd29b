use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;

/// Build the credential chain used for every lookup in a run.
///
/// Order is fixed: named profile (when configured), then environment
/// variables, then the instance role served by the metadata service.
pub fn provider_chain(profile: Option<&str>) -> CredentialsProviderChain {
    let environment = EnvironmentVariableCredentialsProvider::new();

    let chain = match profile {
        Some(name) => {
            tracing::debug!("Using credentials profile {}", name);
            let profile = ProfileFileCredentialsProvider::builder()
                .profile_name(name)
                .build();
            CredentialsProviderChain::first_try("Profile", profile)
                .or_else("Environment", environment)
        }
        None => CredentialsProviderChain::first_try("Environment", environment),
    };

    chain.or_else("Ec2InstanceMetadata", ImdsCredentialsProvider::builder().build())
}

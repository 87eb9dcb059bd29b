use std::time::Duration;
use futures::stream::{self, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use shared::types::{ProbeOutcome, ResolvedInstance};

/// Attempt a TCP connection to `address` within `timeout`.
///
/// A failed shutdown after a successful connect is logged and the target is
/// still considered reachable.
pub async fn tcp_probe(address: &str, timeout: Duration) -> ProbeOutcome {
    let mut stream = match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::info!("Connection error for {}: {}", address, e);
            return ProbeOutcome::Unreachable;
        }
        Err(_) => {
            tracing::info!("Connection to {} timed out after {:?}", address, timeout);
            return ProbeOutcome::Unreachable;
        }
    };

    if let Err(e) = stream.shutdown().await {
        tracing::warn!("Failed to close probe connection to {}: {}", address, e);
    }

    ProbeOutcome::Reachable
}

/// Probe every instance, at most `concurrency` at a time.
/// Results come back in input order.
pub async fn probe_all(
    instances: Vec<ResolvedInstance>,
    timeout: Duration,
    concurrency: usize,
) -> Vec<(ResolvedInstance, ProbeOutcome)> {
    stream::iter(instances)
        .map(|instance| async move {
            let outcome = tcp_probe(&instance.address, timeout).await;
            tracing::debug!("{} ({}) is {}", instance.address, instance.display_name, outcome);
            (instance, outcome)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

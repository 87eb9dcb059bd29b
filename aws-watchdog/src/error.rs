/// A single malformed catalog record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{group}[{index}]: {reason}")]
pub struct RecordError {
    pub group: String,
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Service catalog must be a mapping of groups, got {0}")]
    NotAMapping(&'static str),
    #[error("Service catalog has {} malformed record(s): {}", .0.len(), join(.0))]
    MalformedRecords(Vec<RecordError>),
}

fn join(errors: &[RecordError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of one describe-instances lookup.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("describe-instances failed: {0}")]
    Describe(String),
}

/// Failure to attach an outage to the integration payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Entity requires a name and a type")]
    EntityMetadataRequired,
    #[error("Event summary must not be empty")]
    EmptySummary,
    #[error("Event category must not be empty")]
    EmptyCategory,
}

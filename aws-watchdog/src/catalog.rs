use serde::Deserialize;
use serde_json::Value;
use shared::types::ServiceDefinition;
use crate::error::{CatalogError, RecordError};

/// Raw catalog record, every field string-typed as written by operators.
/// Keys other than these three are ignored.
#[derive(Debug, Deserialize)]
struct ServiceRecord {
    name: String,
    tag: String,
    port: String,
}

/// Parse the `[services]` catalog into typed service definitions.
///
/// Groups that are not lists are skipped with a warning. Any malformed record
/// fails the whole parse; every malformed record is reported, not just the first.
/// Definitions are returned in group order, then record order. Duplicates are kept.
pub fn parse_catalog(value: &Value) -> Result<Vec<ServiceDefinition>, CatalogError> {
    let groups = value
        .as_object()
        .ok_or_else(|| CatalogError::NotAMapping(kind_of(value)))?;

    let mut definitions = Vec::new();
    let mut errors = Vec::new();

    for (group, entries) in groups {
        let Some(records) = entries.as_array() else {
            tracing::warn!("Skipping catalog group {}: expected a list, got {}", group, kind_of(entries));
            continue;
        };

        for (index, record) in records.iter().enumerate() {
            match parse_record(record) {
                Ok(definition) => definitions.push(definition),
                Err(reason) => errors.push(RecordError {
                    group: group.clone(),
                    index,
                    reason,
                }),
            }
        }
    }

    if !errors.is_empty() {
        return Err(CatalogError::MalformedRecords(errors));
    }

    tracing::debug!("Parsed {} service definition(s)", definitions.len());
    Ok(definitions)
}

fn parse_record(record: &Value) -> Result<ServiceDefinition, String> {
    let raw = ServiceRecord::deserialize(record).map_err(|e| e.to_string())?;

    for (field, value) in [("name", &raw.name), ("tag", &raw.tag), ("port", &raw.port)] {
        if value.trim().is_empty() {
            return Err(format!("field `{}` must not be empty", field));
        }
    }

    let port = raw
        .port
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| format!("invalid port {:?}", raw.port))?;

    Ok(ServiceDefinition {
        name: raw.name,
        tag: raw.tag,
        port,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

use std::collections::BTreeMap;
use std::io::Write;
use anyhow::{Context, Result};
use serde::Serialize;
use shared::protocol::{INTEGRATION_NAME, INTEGRATION_VERSION, PROTOCOL_VERSION};
use crate::error::ReportError;

/// Payload handed to the infrastructure agent on stdout
#[derive(Debug, Serialize)]
pub struct Integration {
    pub name: String,
    pub protocol_version: String,
    pub integration_version: String,
    pub data: Vec<Entity>,
}

#[derive(Debug, Serialize)]
pub struct Entity {
    #[serde(rename = "entity")]
    pub metadata: EntityMetadata,
    pub metrics: Vec<serde_json::Value>,
    pub inventory: BTreeMap<String, serde_json::Value>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id_attributes: Vec<IdAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdAttribute {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub summary: String,
    pub category: String,
}

impl Event {
    pub fn new(summary: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            category: category.into(),
        }
    }
}

impl Entity {
    fn new(name: &str, entity_type: &str) -> Self {
        Self {
            metadata: EntityMetadata {
                name: name.to_string(),
                entity_type: entity_type.to_string(),
                id_attributes: Vec::new(),
            },
            metrics: Vec::new(),
            inventory: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Attach an event; summary and category must both be non-blank
    pub fn add_event(&mut self, event: Event) -> Result<(), ReportError> {
        if event.summary.trim().is_empty() {
            return Err(ReportError::EmptySummary);
        }
        if event.category.trim().is_empty() {
            return Err(ReportError::EmptyCategory);
        }
        self.events.push(event);
        Ok(())
    }
}

impl Default for Integration {
    fn default() -> Self {
        Self::new(INTEGRATION_NAME, INTEGRATION_VERSION)
    }
}

impl Integration {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            integration_version: version.to_string(),
            data: Vec::new(),
        }
    }

    /// Find the entity with this name and type, creating it if needed
    pub fn entity(&mut self, name: &str, entity_type: &str) -> Result<&mut Entity, ReportError> {
        if name.is_empty() || entity_type.is_empty() {
            return Err(ReportError::EntityMetadataRequired);
        }

        let position = self
            .data
            .iter()
            .position(|e| e.metadata.name == name && e.metadata.entity_type == entity_type);

        let index = match position {
            Some(index) => index,
            None => {
                self.data.push(Entity::new(name, entity_type));
                self.data.len() - 1
            }
        };
        Ok(&mut self.data[index])
    }

    pub fn event_count(&self) -> usize {
        self.data.iter().map(|e| e.events.len()).sum()
    }

    /// Serialize the accumulated payload to `writer` and reset it
    pub fn publish(&mut self, mut writer: impl Write, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)
        } else {
            serde_json::to_writer(&mut writer, self)
        }
        .context("Failed to serialize integration payload")?;

        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .context("Failed to write integration payload")?;

        tracing::debug!("Published {} entities", self.data.len());
        self.data.clear();
        Ok(())
    }
}

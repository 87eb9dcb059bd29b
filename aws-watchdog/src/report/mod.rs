pub mod integration;

use shared::protocol::HEALTH_ENTITY_TYPE;
use shared::types::ResolvedInstance;
use crate::error::ReportError;
use self::integration::{Event, Integration};

/// Attach an outage event for an unreachable instance to its entity
pub fn report_outage(integration: &mut Integration, instance: &ResolvedInstance) -> Result<(), ReportError> {
    let entity = integration.entity(&instance.entity_key(), HEALTH_ENTITY_TYPE)?;
    entity.add_event(Event::new(instance.outage_summary(), instance.event_category()))?;

    tracing::info!(
        "Reported {} of service {} as not responding",
        instance.address,
        instance.service_name
    );
    Ok(())
}

/// Integration identity reported to the infrastructure agent
pub const INTEGRATION_NAME: &str = "com.acme.aws-watchdog";
pub const INTEGRATION_VERSION: &str = "0.1.0";

/// Agent integration payload protocol
pub const PROTOCOL_VERSION: &str = "3";

/// Entity type for per-instance health entities
pub const HEALTH_ENTITY_TYPE: &str = "acme.safeassign.health";

/// Prefixes for entity keys and event categories
pub const ENTITY_KEY_PREFIX: &str = "app-status";
pub const EVENT_CATEGORY_PREFIX: &str = "app-status-";

/// EC2 describe-instances filter used for instance selection
pub const DEFAULT_TAG_FILTER: &str = "tag:Service";

/// Instance tag holding the display name
pub const NAME_TAG: &str = "Name";

/// Entity ids are opaque strings assigned by the entity store at creation.
pub type EntityId = String;

/// Tenant/user ids are opaque strings issued by the surrounding
/// application's auth layer. Always passed in explicitly, never read from
/// ambient state.
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

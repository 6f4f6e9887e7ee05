/// Events are addressed by the server-assigned UUID.
pub type EventId = uuid::Uuid;

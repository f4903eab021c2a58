//! Event envelopes exchanged with the message bus.
//!
//! Inbound envelopes carry upstream access-code and case updates; outbound
//! envelopes report new addresses and questionnaire links.

mod envelope;
mod payload;
mod publisher;

pub use envelope::{Channel, EventHeader, EventType, GenericEvent, Source};
pub use payload::{
    AccessCodePayload, CasePayload, EventPayload, NewAddress, NewAddressCase,
    QuestionnaireLinkedDetails, QuestionnaireLinkedPayload,
};
pub use publisher::{EventPublisher, InMemoryEventPublisher, LoggingEventPublisher, OutboundEvent};

/// Upstream access-code update.
pub type AccessCodeEvent = GenericEvent<AccessCodePayload>;

/// Upstream case update.
pub type CaseEvent = GenericEvent<CasePayload>;

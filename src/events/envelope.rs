use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    NewAddressReported,
    QuestionnaireLinked,
    UacCreated,
    UacUpdated,
    CaseCreated,
    CaseUpdated,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NewAddressReported => "NEW_ADDRESS_REPORTED",
            Self::QuestionnaireLinked => "QUESTIONNAIRE_LINKED",
            Self::UacCreated => "UAC_CREATED",
            Self::UacUpdated => "UAC_UPDATED",
            Self::CaseCreated => "CASE_CREATED",
            Self::CaseUpdated => "CASE_UPDATED",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    RespondentHome,
    CaseService,
    SampleLoader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Rh,
    Rm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub source: Source,
    pub channel: Channel,
    pub date_time: DateTime<Utc>,
    pub transaction_id: Uuid,
}

impl EventHeader {
    /// Header stamped with the current time and a fresh transaction id.
    pub fn new(event_type: EventType, source: Source, channel: Channel) -> Self {
        Self {
            event_type,
            source,
            channel,
            date_time: Utc::now(),
            transaction_id: Uuid::new_v4(),
        }
    }
}

/// `{"event": {...header...}, "payload": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEvent<P> {
    pub event: EventHeader,
    pub payload: P,
}

impl<P> GenericEvent<P> {
    pub fn new(event_type: EventType, source: Source, channel: Channel, payload: P) -> Self {
        Self {
            event: EventHeader::new(event_type, source, channel),
            payload,
        }
    }
}

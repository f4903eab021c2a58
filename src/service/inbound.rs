use crate::core::{Result, RhError};
use crate::events::{AccessCodeEvent, CaseEvent, EventType, GenericEvent};
use crate::repository::RespondentDataRepository;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

/// Applies upstream access-code and case updates.
///
/// Messages arrive at least once. Each handler is a keyed upsert, so a
/// redelivered message rewrites the same document. Errors are returned to the
/// consumer so the broker can redeliver or dead-letter.
#[derive(Clone)]
pub struct InboundEventHandler {
    repository: RespondentDataRepository,
}

impl InboundEventHandler {
    pub fn new(repository: RespondentDataRepository) -> Self {
        Self { repository }
    }

    pub async fn handle_access_code_event(&self, event: &AccessCodeEvent) -> Result<()> {
        let code = &event.payload.uac;
        if code.code_hash.trim().is_empty() {
            return Err(RhError::bad_request(format!(
                "Access code event {} has no code hash",
                event.event.transaction_id
            )));
        }

        self.repository.write_access_code(code).await?;
        info!(
            transaction_id = %event.event.transaction_id,
            event_type = %event.event.event_type,
            code_hash = %code.code_hash,
            "access code event stored"
        );
        Ok(())
    }

    pub async fn handle_case_event(&self, event: &CaseEvent) -> Result<()> {
        let case = &event.payload.collection_case;
        if case.id.trim().is_empty() {
            return Err(RhError::bad_request(format!(
                "Case event {} has no case id",
                event.event.transaction_id
            )));
        }

        self.repository.write_case(case).await?;
        info!(
            transaction_id = %event.event.transaction_id,
            event_type = %event.event.event_type,
            case_id = %case.id,
            "case event stored"
        );
        Ok(())
    }

    /// Decodes a raw queue message and routes it by its header type.
    pub async fn handle_message(&self, message: &str) -> Result<EventType> {
        let raw: GenericEvent<JsonValue> = serde_json::from_str(message)
            .map_err(|err| RhError::bad_request(format!("Undecodable event: {err}")))?;
        let event_type = raw.event.event_type;
        debug!(event_type = %event_type, transaction_id = %raw.event.transaction_id, "routing inbound event");

        match event_type {
            EventType::UacCreated | EventType::UacUpdated => {
                let event = decode(raw)?;
                self.handle_access_code_event(&event).await?;
            }
            EventType::CaseCreated | EventType::CaseUpdated => {
                let event = decode(raw)?;
                self.handle_case_event(&event).await?;
            }
            other => {
                return Err(RhError::bad_request(format!(
                    "Unsupported inbound event type {other}"
                )));
            }
        }
        Ok(event_type)
    }
}

fn decode<P: serde::de::DeserializeOwned>(raw: GenericEvent<JsonValue>) -> Result<GenericEvent<P>> {
    let payload = serde_json::from_value(raw.payload).map_err(|err| {
        RhError::bad_request(format!(
            "Invalid {} payload in event {}: {}",
            raw.event.event_type, raw.event.transaction_id, err
        ))
    })?;
    Ok(GenericEvent {
        event: raw.event,
        payload,
    })
}

use super::envelope::{Channel, EventType, GenericEvent, Source};
use super::payload::EventPayload;
use crate::core::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

pub type OutboundEvent = GenericEvent<EventPayload>;

/// Fire-and-forget publication to the event bus.
///
/// Returns the transaction id stamped on the published envelope.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        event_type: EventType,
        source: Source,
        channel: Channel,
        payload: EventPayload,
    ) -> Result<Uuid>;
}

/// Writes each event to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(
        &self,
        event_type: EventType,
        source: Source,
        channel: Channel,
        payload: EventPayload,
    ) -> Result<Uuid> {
        let event = OutboundEvent::new(event_type, source, channel, payload);
        let body = serde_json::to_string(&event)?;
        info!(
            event_type = %event_type,
            transaction_id = %event.event.transaction_id,
            body = %body,
            "event published"
        );
        Ok(event.event.transaction_id)
    }
}

/// Keeps published events in memory, in publication order.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<OutboundEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().await.clone()
    }

    pub async fn events_of(&self, event_type: EventType) -> Vec<OutboundEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|event| event.event.event_type == event_type)
            .cloned()
            .collect()
    }

    pub async fn take(&self) -> Vec<OutboundEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(
        &self,
        event_type: EventType,
        source: Source,
        channel: Channel,
        payload: EventPayload,
    ) -> Result<Uuid> {
        let event = OutboundEvent::new(event_type, source, channel, payload);
        let transaction_id = event.event.transaction_id;
        self.events.lock().await.push(event);
        Ok(transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_publisher_records_envelopes() {
        let publisher = InMemoryEventPublisher::new();
        let id = publisher
            .publish(
                EventType::QuestionnaireLinked,
                Source::RespondentHome,
                Channel::Rh,
                EventPayload::questionnaire_linked("q1", "c1", None),
            )
            .await
            .unwrap();

        let events = publisher.events_of(EventType::QuestionnaireLinked).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.transaction_id, id);
        assert!(publisher.events_of(EventType::NewAddressReported).await.is_empty());

        let body = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(body["event"]["type"], json!("QUESTIONNAIRE_LINKED"));
        assert_eq!(body["event"]["channel"], json!("RH"));
        assert_eq!(
            body["payload"],
            json!({"uac": {"questionnaireId": "q1", "caseId": "c1"}})
        );

        assert_eq!(publisher.take().await.len(), 1);
        assert!(publisher.events().await.is_empty());
    }
}

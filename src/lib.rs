// ============================================================================
// Respondent Home Library
// ============================================================================

pub mod config;
pub mod core;
pub mod events;
pub mod linking;
pub mod model;
pub mod repository;
pub mod service;
pub mod storage;

pub use crate::core::{Result, RhError};
pub use config::{AppConfig, StoreBackend};
pub use events::{EventPublisher, InMemoryEventPublisher, LoggingEventPublisher};
pub use linking::{AccessCodeView, LinkAccessCodeRequest, LinkingService, LinkingSettings};
pub use model::{AccessCode, Address, AddressLevel, AddressType, CaseType, CollectionCase, FormType};
pub use repository::{RespondentDataRepository, StoreSchemas};
pub use service::{AccessCodeService, CaseService, InboundEventHandler};
pub use storage::{
    DocumentStore, FileDocumentStore, InMemoryDocumentStore, RecoveryHook, RetryPolicy,
    RetryableDocumentStore,
};

use std::sync::Arc;

/// The assembled service: one store, one publisher, every entry point.
///
/// Collaborators are passed in explicitly; nothing is looked up globally.
///
/// # Examples
///
/// ```
/// use respondent_home::{
///     InMemoryDocumentStore, InMemoryEventPublisher, RespondentHome, RetryPolicy, StoreSchemas,
/// };
/// use std::sync::Arc;
///
/// let home = RespondentHome::builder(Arc::new(InMemoryDocumentStore::new()))
///     .publisher(Arc::new(InMemoryEventPublisher::new()))
///     .schemas(StoreSchemas::new("census-rh", "uac", "case"))
///     .retry_policy(RetryPolicy::default().max_attempts(3))
///     .build();
/// assert_eq!(home.repository().schemas().case, "census-rh-case");
/// ```
#[derive(Clone)]
pub struct RespondentHome {
    repository: RespondentDataRepository,
    access_codes: AccessCodeService,
    cases: CaseService,
    inbound: InboundEventHandler,
}

impl RespondentHome {
    pub fn builder(store: Arc<dyn DocumentStore>) -> RespondentHomeBuilder {
        RespondentHomeBuilder::new(store)
    }

    /// Wires a service from configuration around an already-opened store.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn DocumentStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::builder(store)
            .publisher(publisher)
            .schemas(config.schemas())
            .retry_policy(config.retry.clone())
            .linking_settings(config.linking_settings())
            .build()
    }

    pub fn repository(&self) -> &RespondentDataRepository {
        &self.repository
    }

    pub fn access_codes(&self) -> &AccessCodeService {
        &self.access_codes
    }

    pub fn cases(&self) -> &CaseService {
        &self.cases
    }

    pub fn inbound(&self) -> &InboundEventHandler {
        &self.inbound
    }
}

pub struct RespondentHomeBuilder {
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn EventPublisher>,
    schemas: StoreSchemas,
    retry: RetryPolicy,
    recovery: Option<Arc<dyn RecoveryHook>>,
    settings: LinkingSettings,
}

impl RespondentHomeBuilder {
    fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            publisher: Arc::new(LoggingEventPublisher),
            schemas: StoreSchemas::default(),
            retry: RetryPolicy::default(),
            recovery: None,
            settings: LinkingSettings::default(),
        }
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn schemas(mut self, schemas: StoreSchemas) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn recovery_hook(mut self, recovery: Arc<dyn RecoveryHook>) -> Self {
        self.recovery = Some(recovery);
        self
    }

    pub fn linking_settings(mut self, settings: LinkingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> RespondentHome {
        let mut store = RetryableDocumentStore::new(self.store, self.retry);
        if let Some(recovery) = self.recovery {
            store = store.with_recovery_hook(recovery);
        }
        let repository = RespondentDataRepository::new(store, self.schemas);
        let linker =
            LinkingService::new(repository.clone(), self.publisher).with_settings(self.settings);

        RespondentHome {
            access_codes: AccessCodeService::new(linker),
            cases: CaseService::new(repository.clone()),
            inbound: InboundEventHandler::new(repository.clone()),
            repository,
        }
    }
}

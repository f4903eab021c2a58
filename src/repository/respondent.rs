use super::schemas::StoreSchemas;
use super::selection::select_latest_valid_non_individual;
use crate::core::Result;
use crate::model::{AccessCode, CollectionCase};
use crate::storage::RetryableDocumentStore;
use tracing::debug;

const UPRN_FIELD_PATH: &str = "address.uprn";

/// Typed reads and writes of access codes and cases.
///
/// Errors from the store pass through untouched.
#[derive(Clone)]
pub struct RespondentDataRepository {
    store: RetryableDocumentStore,
    schemas: StoreSchemas,
}

impl RespondentDataRepository {
    pub fn new(store: RetryableDocumentStore, schemas: StoreSchemas) -> Self {
        Self { store, schemas }
    }

    pub fn schemas(&self) -> &StoreSchemas {
        &self.schemas
    }

    pub async fn write_access_code(&self, code: &AccessCode) -> Result<()> {
        debug!(code_hash = %code.code_hash, "writing access code");
        self.store
            .store(&self.schemas.access_code, &code.code_hash, code)
            .await
    }

    pub async fn write_case(&self, case: &CollectionCase) -> Result<()> {
        debug!(case_id = %case.id, "writing collection case");
        self.store.store(&self.schemas.case, &case.id, case).await
    }

    pub async fn read_access_code(&self, code_hash: &str) -> Result<Option<AccessCode>> {
        self.store
            .retrieve(&self.schemas.access_code, code_hash)
            .await
    }

    pub async fn read_case(&self, case_id: &str) -> Result<Option<CollectionCase>> {
        self.store.retrieve(&self.schemas.case, case_id).await
    }

    /// Every case at `uprn`, unfiltered.
    pub async fn read_cases_by_uprn(&self, uprn: &str) -> Result<Vec<CollectionCase>> {
        self.store
            .search(&self.schemas.case, UPRN_FIELD_PATH, uprn)
            .await
    }

    pub async fn read_latest_valid_non_individual_case_by_uprn(
        &self,
        uprn: &str,
    ) -> Result<Option<CollectionCase>> {
        let cases = self.read_cases_by_uprn(uprn).await?;
        let found = cases.len();
        let selected = select_latest_valid_non_individual(cases);
        debug!(
            uprn,
            found,
            selected = selected.as_ref().map(|case| case.id.as_str()),
            "selected latest valid non-individual case"
        );
        Ok(selected)
    }
}

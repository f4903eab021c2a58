use crate::core::{Result, RhError};
use crate::model::CollectionCase;
use crate::repository::RespondentDataRepository;

/// Read-only case queries.
#[derive(Clone)]
pub struct CaseService {
    repository: RespondentDataRepository,
}

impl CaseService {
    pub fn new(repository: RespondentDataRepository) -> Self {
        Self { repository }
    }

    pub async fn get_case(&self, case_id: &str) -> Result<CollectionCase> {
        self.repository
            .read_case(case_id)
            .await?
            .ok_or_else(|| RhError::not_found(format!("Case '{case_id}' not found")))
    }

    pub async fn get_cases_by_uprn(&self, uprn: &str) -> Result<Vec<CollectionCase>> {
        self.repository.read_cases_by_uprn(uprn).await
    }

    pub async fn get_latest_valid_case_by_uprn(&self, uprn: &str) -> Result<CollectionCase> {
        self.repository
            .read_latest_valid_non_individual_case_by_uprn(uprn)
            .await?
            .ok_or_else(|| RhError::not_found(format!("No valid case found for uprn '{uprn}'")))
    }
}

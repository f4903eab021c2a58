use super::types::{CaseType, FormType};
use serde::{Deserialize, Serialize};

/// A single-use questionnaire access code, keyed by the hash of the raw code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCode {
    pub code_hash: String,
    pub active: bool,
    pub questionnaire_id: String,
    pub form_type: FormType,
    /// Case type the code expects to be linked to.
    pub case_type: CaseType,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub collection_exercise_id: Option<String>,
    /// Set once the code has been linked to a case.
    #[serde(default)]
    pub case_id: Option<String>,
}

impl AccessCode {
    pub fn new(
        code_hash: impl Into<String>,
        questionnaire_id: impl Into<String>,
        form_type: FormType,
        case_type: CaseType,
    ) -> Self {
        Self {
            code_hash: code_hash.into(),
            active: true,
            questionnaire_id: questionnaire_id.into(),
            form_type,
            case_type,
            region: None,
            collection_exercise_id: None,
            case_id: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_collection_exercise_id(mut self, id: impl Into<String>) -> Self {
        self.collection_exercise_id = Some(id.into());
        self
    }

    pub fn with_case_id(mut self, case_id: impl Into<String>) -> Self {
        self.case_id = Some(case_id.into());
        self
    }

    pub fn is_linked(&self) -> bool {
        self.case_id.is_some()
    }
}

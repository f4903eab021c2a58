use crate::model::{AccessCode, Address, CaseType, CollectionCase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCodePayload {
    pub uac: AccessCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePayload {
    pub collection_case: CollectionCase,
}

/// Case details reported for an address that had no case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddressCase {
    pub id: String,
    pub case_type: CaseType,
    pub survey: Option<String>,
    pub collection_exercise_id: Option<String>,
    pub address: Address,
    pub ce_expected_capacity: Option<i32>,
}

impl From<&CollectionCase> for NewAddressCase {
    fn from(case: &CollectionCase) -> Self {
        Self {
            id: case.id.clone(),
            case_type: case.case_type,
            survey: case.survey.clone(),
            collection_exercise_id: case.collection_exercise_id.clone(),
            address: case.address.clone(),
            ce_expected_capacity: case.ce_expected_capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub collection_case: NewAddressCase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireLinkedDetails {
    pub questionnaire_id: String,
    pub case_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_case_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireLinkedPayload {
    pub uac: QuestionnaireLinkedDetails,
}

/// Payloads of the facts this service publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    NewAddressReported(NewAddress),
    QuestionnaireLinked(QuestionnaireLinkedPayload),
}

impl EventPayload {
    pub fn new_address(case: &CollectionCase) -> Self {
        Self::NewAddressReported(NewAddress {
            collection_case: NewAddressCase::from(case),
        })
    }

    pub fn questionnaire_linked(
        questionnaire_id: impl Into<String>,
        case_id: impl Into<String>,
        individual_case_id: Option<String>,
    ) -> Self {
        Self::QuestionnaireLinked(QuestionnaireLinkedPayload {
            uac: QuestionnaireLinkedDetails {
                questionnaire_id: questionnaire_id.into(),
                case_id: case_id.into(),
                individual_case_id,
            },
        })
    }
}

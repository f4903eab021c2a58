use crate::model::{AccessCode, Address, CaseType, CollectionCase, FormType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-facing view of an access code and the case it is linked to.
///
/// Built field by field: case values first, then access-code values, which
/// win wherever both carry the same attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeView {
    pub code_hash: String,
    pub active: bool,
    pub questionnaire_id: String,
    pub form_type: FormType,
    pub case_type: CaseType,
    pub region: Option<String>,
    pub collection_exercise_id: Option<String>,
    pub case_id: Option<String>,
    pub case_ref: Option<String>,
    pub survey: Option<String>,
    pub address: Option<Address>,
    pub address_invalid: bool,
    pub hand_delivery: bool,
    pub ce_expected_capacity: Option<i32>,
    pub case_created_date_time: Option<DateTime<Utc>>,
}

impl AccessCodeView {
    /// View of a code with no resolvable case.
    pub fn from_code(code: &AccessCode) -> Self {
        Self {
            code_hash: code.code_hash.clone(),
            active: code.active,
            questionnaire_id: code.questionnaire_id.clone(),
            form_type: code.form_type,
            case_type: code.case_type,
            region: code.region.clone(),
            collection_exercise_id: code.collection_exercise_id.clone(),
            case_id: code.case_id.clone(),
            case_ref: None,
            survey: None,
            address: None,
            address_invalid: false,
            hand_delivery: false,
            ce_expected_capacity: None,
            case_created_date_time: None,
        }
    }

    pub fn merged(case: &CollectionCase, code: &AccessCode) -> Self {
        Self {
            code_hash: code.code_hash.clone(),
            active: code.active,
            questionnaire_id: code.questionnaire_id.clone(),
            form_type: code.form_type,
            case_type: code.case_type,
            region: code.region.clone().or_else(|| case.address.region.clone()),
            collection_exercise_id: code
                .collection_exercise_id
                .clone()
                .or_else(|| case.collection_exercise_id.clone()),
            case_id: code.case_id.clone().or_else(|| Some(case.id.clone())),
            case_ref: case.case_ref.clone(),
            survey: case.survey.clone(),
            address: Some(case.address.clone()),
            address_invalid: case.address_invalid,
            hand_delivery: case.hand_delivery,
            ce_expected_capacity: case.ce_expected_capacity,
            case_created_date_time: case.created_date_time,
        }
    }
}

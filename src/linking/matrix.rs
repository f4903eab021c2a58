use crate::core::{Result, RhError};
use crate::model::{AccessCode, CaseType, CollectionCase, FormType};
use serde::Serialize;

/// One legal pairing of an access code with a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LinkingCombination {
    pub form_type: FormType,
    /// Case type the access code expects.
    pub code_case_type: CaseType,
    /// Case type of the case being linked to.
    pub case_case_type: CaseType,
}

const fn combo(form_type: FormType, code_case_type: CaseType, case_case_type: CaseType) -> LinkingCombination {
    LinkingCombination {
        form_type,
        code_case_type,
        case_case_type,
    }
}

/// Every combination not listed here is rejected.
pub const LINKING_WHITELIST: [LinkingCombination; 10] = [
    combo(FormType::Household, CaseType::Household, CaseType::Household),
    combo(FormType::Household, CaseType::Household, CaseType::SinglePersonGroup),
    combo(FormType::Household, CaseType::SinglePersonGroup, CaseType::Household),
    combo(FormType::Household, CaseType::SinglePersonGroup, CaseType::SinglePersonGroup),
    combo(FormType::Individual, CaseType::Household, CaseType::Household),
    combo(FormType::Individual, CaseType::Household, CaseType::SinglePersonGroup),
    combo(FormType::Individual, CaseType::SinglePersonGroup, CaseType::Household),
    combo(FormType::Individual, CaseType::SinglePersonGroup, CaseType::SinglePersonGroup),
    combo(FormType::Individual, CaseType::CommunalEstablishment, CaseType::CommunalEstablishment),
    combo(
        FormType::EstablishmentIndividual,
        CaseType::CommunalEstablishment,
        CaseType::CommunalEstablishment,
    ),
];

pub fn is_valid_combination(form_type: FormType, code_case_type: CaseType, case_case_type: CaseType) -> bool {
    let candidate = combo(form_type, code_case_type, case_case_type);
    LINKING_WHITELIST.contains(&candidate)
}

pub fn validate_combination(code: &AccessCode, case: &CollectionCase) -> Result<()> {
    if is_valid_combination(code.form_type, code.case_type, case.case_type) {
        return Ok(());
    }
    Err(RhError::bad_request(format!(
        "Failed to link access code '{}' to case '{}': invalid combination formType={} uacCaseType={} caseCaseType={}",
        code.code_hash, case.id, code.form_type, code.case_type, case.case_type
    )))
}

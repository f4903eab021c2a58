use super::matrix::validate_combination;
use super::request::LinkAccessCodeRequest;
use super::view::AccessCodeView;
use crate::core::{Result, RhError};
use crate::events::{Channel, EventPayload, EventPublisher, EventType, Source};
use crate::model::{AccessCode, Address, AddressLevel, AddressType, CaseType, CollectionCase, FormType};
use crate::repository::{RespondentDataRepository, latest_case};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Values stamped onto cases this service creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingSettings {
    pub survey: String,
}

impl Default for LinkingSettings {
    fn default() -> Self {
        Self {
            survey: "CENSUS".to_string(),
        }
    }
}

/// Links access codes to cases, creating cases where an address has none.
///
/// A link either fails before touching the store (unknown code, bad request,
/// illegal combination) or runs to completion. A crash after a new case is
/// written but before the code is updated is repaired by re-running the same
/// request: the uprn search finds the case instead of creating another.
#[derive(Clone)]
pub struct LinkingService {
    repository: RespondentDataRepository,
    publisher: Arc<dyn EventPublisher>,
    settings: LinkingSettings,
}

impl LinkingService {
    pub fn new(repository: RespondentDataRepository, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
            settings: LinkingSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: LinkingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn repository(&self) -> &RespondentDataRepository {
        &self.repository
    }

    pub async fn link_access_code(
        &self,
        code_hash: &str,
        request: &LinkAccessCodeRequest,
    ) -> Result<AccessCodeView> {
        info!(code_hash, uprn = %request.uprn, "linking access code");

        let mut code = self
            .repository
            .read_access_code(code_hash)
            .await?
            .ok_or_else(|| RhError::not_found(format!("Access code '{code_hash}' not found")))?;

        let address_type = request.validate()?;

        let uprn = request.uprn.trim();
        let cases = self.repository.read_cases_by_uprn(uprn).await?;
        let previous_case_id = code.case_id.clone();
        let reusable_individual = previous_case_id.as_deref().and_then(|id| {
            cases
                .iter()
                .find(|case| case.id == id && case.is_individual())
                .cloned()
        });

        let (resolved, newly_reported) = match cases.len() {
            0 => (reported_case(&code, request, address_type, &self.settings), true),
            1 => {
                let only = cases.into_iter().next().ok_or_else(|| {
                    RhError::system(format!("Case list for uprn '{uprn}' emptied"))
                })?;
                (only, false)
            }
            found => {
                let household = latest_case(
                    cases
                        .into_iter()
                        .filter(|case| case.case_type == CaseType::Household),
                )
                .ok_or_else(|| {
                    RhError::system(format!(
                        "Found {found} cases for uprn '{uprn}' but none of type HH"
                    ))
                })?;
                (household, false)
            }
        };

        // Nothing is written until the combination is known to be legal.
        validate_combination(&code, &resolved)?;

        if newly_reported {
            self.persist_reported_case(&resolved).await?;
        }

        code.case_id = Some(resolved.id.clone());

        let mut individual = None;
        if code.form_type == FormType::Individual && resolved.case_type == CaseType::Household {
            let individual_case = match reusable_individual {
                Some(existing) => {
                    debug!(case_id = %existing.id, "reusing individual case already linked to code");
                    existing
                }
                None => {
                    let created = individual_case_for(&resolved);
                    self.repository.write_case(&created).await?;
                    info!(
                        household_case_id = %resolved.id,
                        individual_case_id = %created.id,
                        "created individual case"
                    );
                    created
                }
            };
            code.case_id = Some(individual_case.id.clone());
            individual = Some(individual_case);
        }

        self.repository.write_access_code(&code).await?;

        self.publish(
            EventType::QuestionnaireLinked,
            EventPayload::questionnaire_linked(
                code.questionnaire_id.clone(),
                resolved.id.clone(),
                individual.as_ref().map(|case| case.id.clone()),
            ),
        )
        .await;

        info!(
            code_hash,
            case_id = code.case_id.as_deref().unwrap_or_default(),
            "access code linked"
        );

        let linked_case = individual.as_ref().unwrap_or(&resolved);
        Ok(AccessCodeView::merged(linked_case, &code))
    }

    async fn persist_reported_case(&self, case: &CollectionCase) -> Result<()> {
        self.repository.write_case(case).await?;
        info!(
            case_id = %case.id,
            uprn = %case.address.uprn,
            case_type = %case.case_type,
            "created case for new address"
        );

        self.publish(EventType::NewAddressReported, EventPayload::new_address(case))
            .await;
        Ok(())
    }

    async fn publish(&self, event_type: EventType, payload: EventPayload) {
        if let Err(err) = self
            .publisher
            .publish(event_type, Source::RespondentHome, Channel::Rh, payload)
            .await
        {
            warn!(event_type = %event_type, error = %err, "event publication failed");
        }
    }
}

/// Communal establishments and SPGs reported against a CE form sit at
/// establishment level; everything else is a unit.
fn address_level_for(form_type: FormType, case_type: CaseType) -> AddressLevel {
    match (form_type, case_type) {
        (FormType::EstablishmentIndividual, CaseType::CommunalEstablishment)
        | (FormType::EstablishmentIndividual, CaseType::SinglePersonGroup) => AddressLevel::Establishment,
        _ => AddressLevel::Unit,
    }
}

fn reported_case(
    code: &AccessCode,
    request: &LinkAccessCodeRequest,
    address_type: AddressType,
    settings: &LinkingSettings,
) -> CollectionCase {
    let case_type = address_type.case_type();
    let ce_expected_capacity = match case_type {
        CaseType::CommunalEstablishment => request.ce_expected_capacity,
        _ => None,
    };

    CollectionCase {
        id: Uuid::new_v4().to_string(),
        case_ref: None,
        survey: Some(settings.survey.clone()),
        collection_exercise_id: code.collection_exercise_id.clone(),
        address: Address {
            address_line1: request.address_line1.clone(),
            address_line2: request.address_line2.clone(),
            address_line3: request.address_line3.clone(),
            town_name: request.town_name.clone(),
            postcode: request.postcode.clone(),
            region: request.region.clone().or_else(|| code.region.clone()),
            uprn: request.uprn.trim().to_string(),
            address_type: Some(address_type),
            estab_type: request.estab_type.clone(),
            address_level: Some(address_level_for(code.form_type, case_type)),
        },
        case_type,
        address_invalid: false,
        created_date_time: Some(Utc::now()),
        hand_delivery: false,
        ce_expected_capacity,
    }
}

fn individual_case_for(household: &CollectionCase) -> CollectionCase {
    CollectionCase {
        id: Uuid::new_v4().to_string(),
        case_ref: None,
        survey: household.survey.clone(),
        collection_exercise_id: household.collection_exercise_id.clone(),
        address: household.address.clone(),
        case_type: CaseType::IndividualWithinHH,
        address_invalid: false,
        created_date_time: Some(Utc::now()),
        hand_delivery: household.hand_delivery,
        ce_expected_capacity: None,
    }
}

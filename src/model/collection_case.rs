use super::types::{AddressLevel, AddressType, CaseType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    #[serde(default)]
    pub town_name: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub uprn: String,
    #[serde(default)]
    pub address_type: Option<AddressType>,
    #[serde(default)]
    pub estab_type: Option<String>,
    #[serde(default)]
    pub address_level: Option<AddressLevel>,
}

/// A physical address under enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCase {
    pub id: String,
    #[serde(default)]
    pub case_ref: Option<String>,
    #[serde(default)]
    pub survey: Option<String>,
    #[serde(default)]
    pub collection_exercise_id: Option<String>,
    pub address: Address,
    pub case_type: CaseType,
    #[serde(default)]
    pub address_invalid: bool,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hand_delivery: bool,
    /// Only meaningful for communal establishments.
    #[serde(default)]
    pub ce_expected_capacity: Option<i32>,
}

impl CollectionCase {
    pub fn uprn(&self) -> &str {
        &self.address.uprn
    }

    pub fn is_individual(&self) -> bool {
        self.case_type == CaseType::IndividualWithinHH
    }
}

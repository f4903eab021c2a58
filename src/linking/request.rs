use crate::core::{Result, RhError};
use crate::model::AddressType;
use serde::{Deserialize, Serialize};

/// Address a respondent supplied when linking an access code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccessCodeRequest {
    pub uprn: String,
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
    /// Raw `HH` / `SPG` / `CE`; parsed during validation.
    pub address_type: String,
    #[serde(default)]
    pub estab_type: Option<String>,
    #[serde(default)]
    pub ce_expected_capacity: Option<i32>,
}

impl LinkAccessCodeRequest {
    pub fn new(uprn: impl Into<String>, address_type: impl Into<String>) -> Self {
        Self {
            uprn: uprn.into(),
            address_type: address_type.into(),
            ..Self::default()
        }
    }

    pub fn with_address_line1(mut self, line: impl Into<String>) -> Self {
        self.address_line1 = Some(line.into());
        self
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    pub fn with_town_name(mut self, town: impl Into<String>) -> Self {
        self.town_name = Some(town.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_estab_type(mut self, estab_type: impl Into<String>) -> Self {
        self.estab_type = Some(estab_type.into());
        self
    }

    pub fn with_ce_expected_capacity(mut self, capacity: i32) -> Self {
        self.ce_expected_capacity = Some(capacity);
        self
    }

    /// Checks the request and returns its parsed address type.
    pub fn validate(&self) -> Result<AddressType> {
        if self.uprn.trim().is_empty() {
            return Err(RhError::bad_request("uprn must be provided"));
        }
        self.address_type.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_parses_address_type() {
        let request = LinkAccessCodeRequest::new("100", "SPG");
        assert_eq!(request.validate().unwrap(), AddressType::SinglePersonGroup);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            LinkAccessCodeRequest::new("100", "FLAT").validate(),
            Err(RhError::BadRequest(msg)) if msg.contains("FLAT")
        ));
        assert!(matches!(
            LinkAccessCodeRequest::new("  ", "HH").validate(),
            Err(RhError::BadRequest(_))
        ));
    }

    #[test]
    fn test_request_json_shape() {
        let request: LinkAccessCodeRequest = serde_json::from_str(
            r#"{"uprn": "1347459999", "addressLine1": "1 Main St", "addressType": "CE", "ceExpectedCapacity": 40}"#,
        )
        .unwrap();
        assert_eq!(request.address_line1.as_deref(), Some("1 Main St"));
        assert_eq!(request.ce_expected_capacity, Some(40));
        assert!(request.postcode.is_none());
    }
}

use crate::core::{Result, RhError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Questionnaire form an access code was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormType {
    #[serde(rename = "H")]
    Household,
    #[serde(rename = "I")]
    Individual,
    #[serde(rename = "C")]
    EstablishmentIndividual,
}

impl FormType {
    pub const ALL: [FormType; 3] = [
        FormType::Household,
        FormType::Individual,
        FormType::EstablishmentIndividual,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Household => "H",
            Self::Individual => "I",
            Self::EstablishmentIndividual => "C",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "HH")]
    Household,
    #[serde(rename = "SPG")]
    SinglePersonGroup,
    #[serde(rename = "CE")]
    CommunalEstablishment,
    #[serde(rename = "HI")]
    IndividualWithinHH,
}

impl CaseType {
    pub const ALL: [CaseType; 4] = [
        CaseType::Household,
        CaseType::SinglePersonGroup,
        CaseType::CommunalEstablishment,
        CaseType::IndividualWithinHH,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Household => "HH",
            Self::SinglePersonGroup => "SPG",
            Self::CommunalEstablishment => "CE",
            Self::IndividualWithinHH => "HI",
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Address classification supplied by a respondent when reporting an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    #[serde(rename = "HH")]
    Household,
    #[serde(rename = "SPG")]
    SinglePersonGroup,
    #[serde(rename = "CE")]
    CommunalEstablishment,
}

impl AddressType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Household => "HH",
            Self::SinglePersonGroup => "SPG",
            Self::CommunalEstablishment => "CE",
        }
    }

    /// Case type a newly reported address of this type is created as.
    pub fn case_type(&self) -> CaseType {
        match self {
            Self::Household => CaseType::Household,
            Self::SinglePersonGroup => CaseType::SinglePersonGroup,
            Self::CommunalEstablishment => CaseType::CommunalEstablishment,
        }
    }
}

impl FromStr for AddressType {
    type Err = RhError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim() {
            "HH" => Ok(Self::Household),
            "SPG" => Ok(Self::SinglePersonGroup),
            "CE" => Ok(Self::CommunalEstablishment),
            other => Err(RhError::bad_request(format!(
                "Invalid addressType '{other}'"
            ))),
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressLevel {
    #[serde(rename = "E")]
    Establishment,
    #[serde(rename = "U")]
    Unit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_type_parsing() {
        assert_eq!("HH".parse::<AddressType>().unwrap(), AddressType::Household);
        assert_eq!(" CE ".parse::<AddressType>().unwrap(), AddressType::CommunalEstablishment);
        assert!(matches!(
            "XX".parse::<AddressType>(),
            Err(RhError::BadRequest(_))
        ));
        assert!("hh".parse::<AddressType>().is_err());
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(serde_json::to_string(&CaseType::IndividualWithinHH).unwrap(), "\"HI\"");
        assert_eq!(serde_json::to_string(&FormType::EstablishmentIndividual).unwrap(), "\"C\"");
        let parsed: AddressLevel = serde_json::from_str("\"E\"").unwrap();
        assert_eq!(parsed, AddressLevel::Establishment);
    }
}

use serde::{Deserialize, Serialize};

/// Physical collection names for the two entity kinds.
///
/// A name is the deployment prefix joined to the logical entity name,
/// lower-cased: prefix `RH-Prod` and name `UAC` give `rh-prod-uac`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSchemas {
    pub access_code: String,
    pub case: String,
}

impl StoreSchemas {
    pub fn new(prefix: &str, access_code_name: &str, case_name: &str) -> Self {
        Self {
            access_code: schema_name(prefix, access_code_name),
            case: schema_name(prefix, case_name),
        }
    }
}

impl Default for StoreSchemas {
    fn default() -> Self {
        Self::new("rh-local", "uac", "case")
    }
}

pub fn schema_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_lowercase()
    } else {
        format!("{prefix}-{name}").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_are_prefixed_and_lowercased() {
        let schemas = StoreSchemas::new("Census-RH-Prod", "UAC", "Case");
        assert_eq!(schemas.access_code, "census-rh-prod-uac");
        assert_eq!(schemas.case, "census-rh-prod-case");
    }

    #[test]
    fn test_empty_prefix() {
        assert_eq!(schema_name("", "Case"), "case");
    }
}

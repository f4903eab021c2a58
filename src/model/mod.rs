//! Persisted respondent entities.

mod access_code;
mod collection_case;
mod types;

pub use access_code::AccessCode;
pub use collection_case::{Address, CollectionCase};
pub use types::{AddressLevel, AddressType, CaseType, FormType};

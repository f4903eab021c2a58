//! Typed persistence for access codes and collection cases.

mod respondent;
mod schemas;
mod selection;

pub use respondent::RespondentDataRepository;
pub use schemas::StoreSchemas;
pub use selection::{latest_case, select_latest_valid_non_individual};

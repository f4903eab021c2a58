//! Access-code to case linking.
//!
//! - `matrix.rs` - the literal whitelist of legal (form, code case, case) triples
//! - `request.rs` - address details supplied with a link request
//! - `view.rs` - merged code + case view returned to callers
//! - `engine.rs` - the linking operation itself

mod engine;
mod matrix;
mod request;
mod view;

pub use engine::{LinkingService, LinkingSettings};
pub use matrix::{LINKING_WHITELIST, LinkingCombination, is_valid_combination, validate_combination};
pub use request::LinkAccessCodeRequest;
pub use view::AccessCodeView;

//! Entry points used by the surrounding transport: synchronous queries,
//! the link operation and inbound queue handlers.

mod access_code;
mod case;
mod inbound;

pub use access_code::AccessCodeService;
pub use case::CaseService;
pub use inbound::InboundEventHandler;

//! Data models for the volunteer coordination application.
//!
//! Documents are schemaless in the store: every model keeps the fields it
//! understands typed and passes anything else through verbatim.

mod ack;
mod fields;
mod post;
mod session;
mod volunteer;

pub use ack::*;
pub use fields::*;
pub use post::*;
pub use session::*;
pub use volunteer::*;

//! The payload sent to Rollbar.
//!
//! All nodes are immutable once created. Nodes with required fields or length limits are
//! validated by their constructors and builders, and again when deserialized.

mod body;
mod data;
mod extensible;
mod frame;
mod item;
mod level;
mod message;
mod notifier;
mod person;
mod request;
mod server;
mod trace;
mod validate;

pub use body::*;
pub use data::*;
pub use extensible::{Extensible, Members};
pub(crate) use extensible::{
    deserialize_extensible, put_all, serialize_extensible, sealed::Sealed,
};
pub use frame::*;
pub use item::*;
pub use level::*;
pub use message::*;
pub use notifier::*;
pub use person::*;
pub use request::*;
pub use server::*;
pub use trace::*;
pub(crate) use validate::*;

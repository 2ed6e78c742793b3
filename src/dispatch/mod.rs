//! Update dispatch module.
//!
//! One dispatch is a full fetch → render → deliver cycle, shared by the
//! scheduler and the `/price` command.

mod dispatcher;

pub use dispatcher::{DispatchError, DispatchKind, ERROR_NOTICE, UpdateDispatcher, caption};

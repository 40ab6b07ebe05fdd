//! Events, scoped values and lifecycle-reporting commands.
//!
//! - [`EventTarget`]: listeners keyed by event name
//! - [`EventHub`]: one typed event with optional validation
//! - [`EventBus`]: hubs keyed by payload type
//! - [`Context`]: values visible inside an entered [`Scope`]
//! - [`Command`]: async work that emits `started`, `completed` and `failed`

pub mod bus;
pub mod command;
pub mod context;
pub mod error;
pub mod hub;
pub mod target;

pub use bus::EventBus;
pub use command::{Command, Completed, Failed};
pub use context::{Context, Scope};
pub use error::ScopeError;
pub use hub::{EventHub, Subscription};
pub use target::{EventTarget, ListenerId};

//! # mkit
//!
//! Small utility constructors bundled behind one import:
//!
//! - a service container with declared, lazy and eager services
//!   ([`make_container`], [`Container`])
//! - typed events and scoped values ([`EventHub`], [`EventBus`], [`Context`])
//! - string transformers ([`support`])
//!
//! ```rust
//! use mkit::prelude::*;
//!
//! let container = make_container(|b| {
//!     b.eager("greeting", |_| Ok(String::from("hello")))
//!         .lazy("shout", |c| Ok(c.get::<String>("greeting")?.to_uppercase()))
//! })
//! .and_then(Resolution::ready)
//! .unwrap();
//!
//! assert_eq!(*container.get::<String>("shout").unwrap(), "HELLO");
//! ```

pub use mkit_container as container;
pub use mkit_events as events;
pub use mkit_support as support;

pub use mkit_container::{
    Container, ContainerBuilder, ContainerError, Import, Resolution, Result, ServiceKey, ServiceKind,
    ServiceMap, make_container,
};
pub use mkit_events::{
    Command, Context, EventBus, EventHub, EventTarget, Scope, ScopeError, Subscription,
};

pub mod prelude {
    pub use mkit_container::prelude::*;
    pub use mkit_events::{Command, Context, EventBus, EventHub, Subscription};
}

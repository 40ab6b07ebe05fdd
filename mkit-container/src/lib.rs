//! Service container for mkit.
//!
//! Register named services lazily or eagerly, declare services to be
//! provided later, compose registries, then resolve them into a
//! [`Container`](container::Container).

pub mod container;
mod cycle;
pub mod error;
pub mod import;
pub mod key;
pub mod kind;
pub mod registry;
pub mod resolution;

pub use container::{Container, ContainerBuilder, make_container, prelude};
pub use error::{ContainerError, Result};
pub use import::{Import, ServiceMap};
pub use key::ServiceKey;
pub use kind::ServiceKind;
pub use resolution::Resolution;

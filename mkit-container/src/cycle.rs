//! Cycle detection for lazy resolution.
//!
//! Lazy factories may read other lazy keys, so dependency chains are only
//! discovered while values are being built. Each thread records the keys it
//! is currently building, per container; re-entering one of them is a cycle.
//!
//! Other threads are not tracked here: a concurrent first read of a key that
//! is being built elsewhere simply waits on that key's cell.

use std::cell::RefCell;

use mkit_support::rendering::render_chain;
use tracing::warn;

use crate::error::{CircularDependencyError, ContainerError, Result};
use crate::key::ServiceKey;

thread_local! {
    static RESOLVING: RefCell<Vec<(u64, ServiceKey)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a key as "being built" until dropped.
#[derive(Debug)]
pub(crate) struct ResolutionGuard {
    container_id: u64,
    key: ServiceKey,
}

/// Records that `key` of container `container_id` is being built.
///
/// # Errors
/// [`ContainerError::CircularDependency`] if this thread is already
/// building `key` for the same container.
pub(crate) fn enter(container_id: u64, key: &ServiceKey) -> Result<ResolutionGuard> {
    RESOLVING.with(|stack| {
        let mut stack = stack.borrow_mut();

        if let Some(start) = stack
            .iter()
            .position(|(id, k)| *id == container_id && k == key)
        {
            let mut chain: Vec<String> = stack[start..]
                .iter()
                .filter(|(id, _)| *id == container_id)
                .map(|(_, k)| k.to_string())
                .collect();
            chain.push(key.to_string());

            warn!(cycle = %render_chain(&chain), "Circular dependency detected!");

            return Err(ContainerError::CircularDependency(CircularDependencyError { chain }));
        }

        stack.push((container_id, key.clone()));
        Ok(ResolutionGuard {
            container_id,
            key: key.clone(),
        })
    })
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        let _ = RESOLVING.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack
                .iter()
                .rposition(|(id, k)| *id == self.container_id && *k == self.key)
            {
                stack.remove(pos);
            }
        });
    }
}

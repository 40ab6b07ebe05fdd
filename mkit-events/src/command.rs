//! Async commands that announce their lifecycle.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use mkit_support::rendering::shorten_type_name;
use tracing::{debug, instrument, warn};

use crate::hub::EventHub;
use crate::target::EventTarget;

type Handler<I, O, E> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, E>> + Send + Sync>;

/// Payload of the `completed` event.
#[derive(Debug)]
pub struct Completed<I, O> {
    pub input: I,
    pub output: O,
}

/// Payload of the `failed` event.
#[derive(Debug)]
pub struct Failed<I, E> {
    pub input: I,
    pub error: E,
}

/// An async operation with `started`, `completed` and `failed` hubs.
///
/// ```
/// use mkit_events::Command;
///
/// # futures::executor::block_on(async {
/// let double = Command::new(|n: u32| async move { Ok::<_, String>(n * 2) });
/// let _sub = double.completed().subscribe(|done| println!("{} -> {}", done.input, done.output));
/// assert_eq!(double.run(4).await, Ok(8));
/// # });
/// ```
pub struct Command<I, O, E> {
    handler: Handler<I, O, E>,
    started: EventHub<I>,
    completed: EventHub<Completed<I, O>>,
    failed: EventHub<Failed<I, E>>,
}

impl<I, O, E> Command<I, O, E>
where
    I: Clone + Send + Sync + 'static,
    O: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        let target = EventTarget::new();
        Self {
            handler: Arc::new(move |input| handler(input).boxed()),
            started: EventHub::on("started", &target),
            completed: EventHub::on("completed", &target),
            failed: EventHub::on("failed", &target),
        }
    }

    /// Runs the handler, announcing `started` first and then either
    /// `completed` or `failed`. The handler's result is returned unchanged.
    #[instrument(skip_all, fields(input = std::any::type_name::<I>()))]
    pub async fn run(&self, input: I) -> Result<O, E> {
        self.started.dispatch_ref(&input);
        debug!("Command started");

        match (self.handler)(input.clone()).await {
            Ok(output) => {
                let completed = Completed { input, output };
                self.completed.dispatch_ref(&completed);
                debug!("Command completed");
                Ok(completed.output)
            }
            Err(error) => {
                let failed = Failed { input, error };
                self.failed.dispatch_ref(&failed);
                warn!("Command failed");
                Err(failed.error)
            }
        }
    }

    pub fn started(&self) -> &EventHub<I> {
        &self.started
    }

    pub fn completed(&self) -> &EventHub<Completed<I, O>> {
        &self.completed
    }

    pub fn failed(&self) -> &EventHub<Failed<I, E>> {
        &self.failed
    }
}

impl<I, O, E> Clone for Command<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            started: self.started.clone(),
            completed: self.completed.clone(),
            failed: self.failed.clone(),
        }
    }
}

impl<I, O, E> fmt::Debug for Command<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("input", &shorten_type_name(std::any::type_name::<I>()))
            .field("output", &shorten_type_name(std::any::type_name::<O>()))
            .finish()
    }
}

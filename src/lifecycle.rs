//! Explicit lifecycle registration for the view.
//!
//! A handler is bound to an event once, at startup. Dispatching an event
//! spawns its handler on the view's local executor at most once; the handler
//! future yields `()`, so the dispatcher never sees a failure from it.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawnExt, SpawnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The view has drawn its first frame and may run startup logic.
    Ready,
}

pub trait LifecycleHandler {
    fn name(&self) -> &str;
    fn handle(&self, event: LifecycleEvent) -> LocalBoxFuture<'static, ()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Bound,
    /// The event already had a handler; the existing binding is kept.
    AlreadyBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Spawned,
    AlreadyFired,
    Unbound,
}

#[derive(Default)]
pub struct Lifecycle {
    handlers: HashMap<LifecycleEvent, Rc<dyn LifecycleHandler>>,
    fired: HashSet<LifecycleEvent>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `event`. Never invokes anything.
    pub fn register(
        &mut self,
        event: LifecycleEvent,
        handler: Rc<dyn LifecycleHandler>,
    ) -> Registration {
        if let Some(existing) = self.handlers.get(&event) {
            tracing::warn!(
                "{event:?} already bound to {}, ignoring {}",
                existing.name(),
                handler.name()
            );
            return Registration::AlreadyBound;
        }

        tracing::debug!("{event:?} bound to {}", handler.name());
        self.handlers.insert(event, handler);
        Registration::Bound
    }

    pub fn dispatch(
        &mut self,
        event: LifecycleEvent,
        spawner: &LocalSpawner,
    ) -> Result<Dispatch, SpawnError> {
        if self.fired.contains(&event) {
            tracing::warn!("{event:?} fired again, ignoring");
            return Ok(Dispatch::AlreadyFired);
        }

        let Some(handler) = self.handlers.get(&event) else {
            tracing::debug!("{event:?} fired with no handler bound");
            return Ok(Dispatch::Unbound);
        };

        spawner.spawn_local(handler.handle(event))?;
        self.fired.insert(event);
        tracing::info!("{event:?} dispatched to {}", handler.name());
        Ok(Dispatch::Spawned)
    }
}

//! System capabilities: per-frame updates and typed event listeners.
//!
//! Both traits take `&self`. The engine only holds shared handles to
//! systems, so a system may be called again while it is already running
//! (an event it emits can come back to it). Implementors keep their own
//! state in `Cell` or `RefCell` and must not hold a borrow across calls
//! into the engine.

use crate::engine::EcsEngine;

/// Logic run once per [`EcsEngine::update`] call.
pub trait Updateable {
    fn update(&self, engine: &mut EcsEngine);
}

/// Receives events of type `E` emitted through [`EcsEngine::emit`].
///
/// A type may listen to several event types by implementing this trait once
/// per event type.
pub trait EventListener<E> {
    fn receive(&self, engine: &mut EcsEngine, event: &E);
}

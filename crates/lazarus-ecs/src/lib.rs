//! **lazarus-ecs**: a small entity-component-system runtime.
//!
//! - [`Entity`]: an identifier owning at most one component per type, plus
//!   a soft-deletion flag.
//! - [`EcsEngine`]: the registry. It runs typed queries over
//!   [`ComponentSet`] tuples, dispatches events to [`EventListener`]s, drives
//!   [`Updateable`] systems and garbage-collects deleted entities once per
//!   [`update`](EcsEngine::update).
//!
//! Everything is single-threaded. Systems and listeners are shared `Rc`
//! handles owned by the caller; they take `&self` and keep their own state
//! in `Cell`/`RefCell`.

pub mod component;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;

pub use component::{Component, ComponentSet, EntityView};
pub use engine::EcsEngine;
pub use entity::{Entity, EntityAllocator, EntityId};
pub use error::{EcsError, Result};
pub use event::{EventListener, Updateable};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Payload(u8);

    proptest! {
        #[test]
        fn factory_ids_strictly_increase(ops in proptest::collection::vec(0u8..4, 1..64)) {
            let mut engine = EcsEngine::new();
            let mut last: Option<EntityId> = None;
            for op in ops {
                match op {
                    0 | 1 => {
                        let e = engine.add_entity();
                        let id = e.id();
                        e.add_component(Payload(op)).unwrap();
                        prop_assert!(last.is_none_or(|prev| id > prev));
                        last = Some(id);
                    }
                    2 => {
                        if let Some(id) = last {
                            if let Some(e) = engine.get_entity_mut(id) {
                                e.mark_for_deletion();
                            }
                        }
                    }
                    _ => engine.update(),
                }
            }
            let with_payload = engine.entities_with_components::<(Payload,)>(false);
            prop_assert!(with_payload.iter().all(|e| e.get::<Payload>().is_some_and(|p| p.0 < 2)));
        }
    }
}

//! The engine: entity registry, queries, event dispatch and the update loop.

use std::any::{Any, TypeId, type_name};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::component::{ComponentSet, EntityView};
use crate::entity::{Entity, EntityAllocator, EntityId};
use crate::error::{EcsError, Result};
use crate::event::{EventListener, Updateable};

type Listeners<E> = Vec<Rc<dyn EventListener<E>>>;

/// Owns every entity and references the systems driving them.
///
/// Entities are iterated in identifier order. Listeners and updateables are
/// shared handles owned by the caller; the engine only keeps clones of them.
pub struct EcsEngine {
    allocator: EntityAllocator,
    entities: BTreeMap<EntityId, Entity>,
    updateables: Vec<Rc<dyn Updateable>>,
    // event TypeId -> Listeners<E>
    subscribers: HashMap<TypeId, Box<dyn Any>>,
}

impl Default for EcsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EcsEngine {
    pub fn new() -> Self {
        Self::with_allocator(EntityAllocator::new())
    }

    /// An engine drawing identifiers from `allocator`.
    pub fn with_allocator(allocator: EntityAllocator) -> Self {
        Self {
            allocator,
            entities: BTreeMap::new(),
            updateables: Vec::new(),
            subscribers: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Create and register an empty entity with a fresh identifier.
    pub fn add_entity(&mut self) -> &mut Entity {
        let id = self.allocator.allocate();
        self.insert(Entity::with_id(id))
    }

    /// An empty entity with a fresh identifier that is not registered yet.
    pub fn create_detached(&mut self) -> Entity {
        Entity::with_id(self.allocator.allocate())
    }

    /// Register an entity built elsewhere under its own identifier.
    ///
    /// An entity already registered under that identifier is replaced.
    pub fn add_existing_entity(&mut self, entity: Entity) -> &mut Entity {
        self.allocator.reserve(entity.id);
        self.insert(entity)
    }

    fn insert(&mut self, entity: Entity) -> &mut Entity {
        match self.entities.entry(entity.id) {
            Entry::Occupied(mut slot) => {
                log::warn!("entity {} registered twice, replacing it", entity.id);
                slot.insert(entity);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entity),
        }
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Unregister an entity immediately, bypassing garbage collection.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Number of registered entities, deleted ones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Entities holding every component in `Q`.
    pub fn entities_with_components<Q: ComponentSet>(&self, include_deleted: bool) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| include_deleted || !e.deleted)
            .filter(|e| Q::contained_in(e))
            .collect()
    }

    /// Call `f` with a view of each entity holding every component in `Q`
    /// and mutable references to those components.
    ///
    /// ```
    /// # use lazarus_ecs::EcsEngine;
    /// struct Hp(i32);
    /// let mut engine = EcsEngine::new();
    /// engine.add_entity().add_component(Hp(3)).unwrap();
    /// engine.apply_to_each::<(Hp,), _>(false, |_, (hp,)| hp.0 -= 1);
    /// ```
    pub fn apply_to_each<'e, Q, F>(&'e mut self, include_deleted: bool, mut f: F)
    where
        Q: ComponentSet,
        F: FnMut(EntityView<'e>, Q::Refs<'e>),
    {
        for entity in self.entities.values_mut() {
            let Entity {
                id,
                components,
                deleted,
            } = entity;
            if *deleted && !include_deleted {
                continue;
            }
            if let Some(refs) = Q::fetch(components) {
                f(EntityView { id: *id, deleted }, refs);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Systems
    // -----------------------------------------------------------------------

    /// Run `system` on every [`update`](Self::update), after the systems
    /// registered before it. Registering twice runs it twice.
    pub fn register_updateable<U: Updateable + 'static>(&mut self, system: &Rc<U>) {
        self.updateables.push(system.clone());
    }

    pub fn updateable_count(&self) -> usize {
        self.updateables.len()
    }

    /// Run every updateable in registration order, then collect garbage.
    ///
    /// Systems registered during the pass run from the next call on.
    pub fn update(&mut self) {
        let systems = self.updateables.clone();
        for system in &systems {
            system.update(self);
        }
        self.garbage_collect();
    }

    /// Drop every entity flagged for deletion. Returns how many were dropped.
    pub fn garbage_collect(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, e| !e.deleted);
        let collected = before - self.entities.len();
        if collected > 0 {
            log::debug!("garbage collected {collected} entities");
        }
        collected
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    fn listeners<E: 'static>(&self) -> Option<&Listeners<E>> {
        self.subscribers
            .get(&TypeId::of::<E>())
            .and_then(|slot| (**slot).downcast_ref::<Listeners<E>>())
    }

    /// Detach the `E` listener list from the registry, empty if there is none.
    fn take_listeners<E: 'static>(&mut self) -> Listeners<E> {
        self.subscribers
            .remove(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast::<Listeners<E>>().ok())
            .map(|listeners| *listeners)
            .unwrap_or_default()
    }

    fn put_listeners<E: 'static>(&mut self, listeners: Listeners<E>) {
        if !listeners.is_empty() {
            self.subscribers
                .insert(TypeId::of::<E>(), Box::new(listeners));
        }
    }

    /// Deliver future `E` events to `listener`. Subscribing a listener that
    /// is already subscribed to `E` does nothing.
    pub fn subscribe<E, L>(&mut self, listener: &Rc<L>)
    where
        E: 'static,
        L: EventListener<E> + 'static,
    {
        let mut listeners = self.take_listeners::<E>();
        if !listeners.iter().any(|l| same_handle(l, listener)) {
            listeners.push(listener.clone());
        }
        self.put_listeners(listeners);
    }

    /// Stop delivering `E` events to `listener`.
    ///
    /// An emission already in progress still reaches it.
    pub fn unsubscribe<E, L>(&mut self, listener: &Rc<L>) -> Result<()>
    where
        E: 'static,
        L: EventListener<E> + 'static,
    {
        let mut listeners = self.take_listeners::<E>();
        let found = listeners.iter().position(|l| same_handle(l, listener));
        if let Some(pos) = found {
            listeners.remove(pos);
        }
        self.put_listeners(listeners);
        found.map(|_| ()).ok_or(EcsError::NotSubscribed {
            event: type_name::<E>(),
        })
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.listeners::<E>().map_or(0, Vec::len)
    }

    /// Synchronously hand `event` to every `E` listener, in subscription
    /// order.
    ///
    /// Listeners see the subscriber list as it was when the emission began:
    /// subscriptions and unsubscriptions made by a listener take effect from
    /// the next emission. Emitting from inside `receive` is allowed and
    /// reaches every listener, the emitting one included.
    pub fn emit<E: 'static>(&mut self, event: &E) {
        let Some(listeners) = self.listeners::<E>().cloned() else {
            log::trace!("no listeners for {}", type_name::<E>());
            return;
        };
        for listener in &listeners {
            listener.receive(self, event);
        }
    }
}

/// Whether `stored` and `handle` point at the same listener.
fn same_handle<E, L>(stored: &Rc<dyn EventListener<E>>, handle: &Rc<L>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(stored), Rc::as_ptr(handle))
}

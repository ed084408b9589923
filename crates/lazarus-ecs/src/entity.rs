//! Entities, their identifiers and the identifier allocator.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::component::{Component, ComponentSet};
use crate::error::{EcsError, Result};

/// A unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing entity identifiers. Identifiers are never
/// reused, even after the entity is gone.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Identifiers start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next_id: first }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Make sure `id` is never handed out in the future.
    pub fn reserve(&mut self, id: EntityId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    /// The identifier the next [`allocate`](Self::allocate) call returns.
    #[must_use]
    pub fn peek(&self) -> EntityId {
        EntityId(self.next_id)
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// An identifier with at most one component of each type and a soft
/// deletion flag.
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) components: HashMap<TypeId, Box<dyn Any>>,
    pub(crate) deleted: bool,
}

impl Entity {
    /// An empty entity with a caller-chosen identifier.
    #[must_use]
    pub fn with_id(id: EntityId) -> Self {
        Self {
            id,
            components: HashMap::new(),
            deleted: false,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn has<T: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    /// Whether every component type in the tuple `Q` is present.
    pub fn has_all<Q: ComponentSet>(&self) -> bool {
        Q::contained_in(self)
    }

    /// Attach `component`. Returns the entity so additions can be chained.
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut Self> {
        match self.components.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => Err(EcsError::DuplicateComponent {
                entity: self.id,
                component: type_name::<T>(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Box::new(component));
                Ok(self)
            }
        }
    }

    /// Detach the component of type `T` and hand it back.
    pub fn remove_component<T: Component>(&mut self) -> Result<T> {
        self.components
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
            .ok_or(EcsError::MissingComponent {
                entity: self.id,
                component: type_name::<T>(),
            })
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|c| (**c).downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| (**c).downcast_mut::<T>())
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Flag the entity for removal at the next garbage collection.
    pub fn mark_for_deletion(&mut self) {
        self.deleted = true;
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.components.len())
            .field("deleted", &self.deleted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    #[derive(Debug, PartialEq)]
    struct Name {
        label: String,
        level: i32,
        hostile: bool,
    }

    struct Marker;

    fn entity() -> Entity {
        Entity::with_id(EntityId(7))
    }

    #[test]
    fn allocator_is_monotonic() {
        let mut ids = EntityAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(a, EntityId(1));
        assert_eq!(b.raw(), a.raw() + 1);

        let mut ids = EntityAllocator::starting_at(100);
        ids.reserve(EntityId(50));
        assert_eq!(ids.peek(), EntityId(100));
        ids.reserve(EntityId(200));
        assert_eq!(ids.allocate(), EntityId(201));
    }

    #[test]
    fn new_entity_is_empty_and_live() {
        let e = entity();
        assert_eq!(e.id(), EntityId(7));
        assert!(!e.has::<Health>());
        assert!(!e.has::<Name>());
        assert!(!e.is_deleted());
        assert_eq!(e.component_count(), 0);
    }

    #[test]
    fn add_components() {
        let mut e = entity();
        e.add_component(Health(25)).unwrap();
        assert_eq!(e.get::<Health>(), Some(&Health(25)));
        e.add_component(Name {
            label: "test".into(),
            level: 14,
            hostile: false,
        })
        .unwrap();
        e.add_component(Marker).unwrap();
        assert_eq!(e.component_count(), 3);
    }

    #[test]
    fn additions_chain() {
        let mut e = entity();
        e.add_component(Health(3))
            .and_then(|e| e.add_component(Marker))
            .unwrap();
        assert!(e.has_all::<(Health, Marker)>());
        assert!(e.add_component(Marker).and_then(|e| e.add_component(Health(4))).is_err());
        assert_eq!(e.get::<Health>(), Some(&Health(3)));
    }

    #[test]
    fn duplicate_component_is_rejected() {
        let mut e = entity();
        e.add_component(Health(1)).unwrap();
        let err = e.add_component(Health(2)).unwrap_err();
        assert!(matches!(
            err,
            EcsError::DuplicateComponent {
                entity: EntityId(7),
                ..
            }
        ));
        assert!(err.to_string().contains("Health"));
        assert_eq!(e.get::<Health>(), Some(&Health(1)));
    }

    #[test]
    fn has_one_or_many() {
        let mut e = entity();
        e.add_component(Health(25)).unwrap();
        e.add_component(Name {
            label: "test".into(),
            level: 14,
            hostile: false,
        })
        .unwrap();
        assert!(e.has::<Health>());
        assert!(e.has::<Name>());
        assert!(!e.has::<Marker>());
        assert!(e.has_all::<(Health, Name)>());
        assert!(!e.has_all::<(Health, Marker)>());
    }

    #[test]
    fn get_and_modify_through_handle() {
        let mut e = entity();
        e.add_component(Name {
            label: "test".into(),
            level: -5,
            hostile: false,
        })
        .unwrap();
        let name = e.get::<Name>().unwrap();
        assert_eq!((name.label.as_str(), name.level), ("test", -5));
        assert!(!name.hostile);

        e.get_mut::<Name>().unwrap().level = 100;
        assert_eq!(e.get::<Name>().unwrap().level, 100);
        assert!(e.get::<Health>().is_none());
    }

    #[test]
    fn remove_components() {
        let mut e = entity();
        e.add_component(Health(15)).unwrap();
        assert_eq!(e.remove_component::<Health>(), Ok(Health(15)));
        assert!(!e.has::<Health>());
        assert!(matches!(
            e.remove_component::<Name>(),
            Err(EcsError::MissingComponent { .. })
        ));
        e.add_component(Health(99)).unwrap();
        assert!(e.has::<Health>());
    }

    #[test]
    fn deletion_flag() {
        let mut e = entity();
        e.mark_for_deletion();
        assert!(e.is_deleted());
    }
}

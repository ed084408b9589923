//! Component capability and typed multi-component access.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::entity::{Entity, EntityId};

/// Any `'static` type can be stored as a component.
pub trait Component: Any {}

impl<T: Any> Component for T {}

/// A tuple of component types fetched together, e.g. `(Position, Health)`.
///
/// Implemented for tuples of one to eight distinct component types. A tuple
/// naming the same type twice never matches.
pub trait ComponentSet {
    /// Mutable references to each component, in tuple order.
    type Refs<'a>;

    /// Whether `entity` holds every component in the set.
    fn contained_in(entity: &Entity) -> bool;

    /// Borrow every component in the set from one entity's storage.
    fn fetch(components: &mut HashMap<TypeId, Box<dyn Any>>) -> Option<Self::Refs<'_>>;
}

macro_rules! impl_component_set {
    ($($ty:ident $slot:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            type Refs<'a> = ($(&'a mut $ty,)+);

            fn contained_in(entity: &Entity) -> bool {
                $(entity.has::<$ty>())&&+
            }

            fn fetch(components: &mut HashMap<TypeId, Box<dyn Any>>) -> Option<Self::Refs<'_>> {
                $(let mut $slot: Option<&mut $ty> = None;)+
                for (type_id, component) in components.iter_mut() {
                    $(
                        if *type_id == TypeId::of::<$ty>() {
                            $slot = (**component).downcast_mut::<$ty>();
                            continue;
                        }
                    )+
                }
                Some(($($slot?,)+))
            }
        }
    };
}

impl_component_set!(A a);
impl_component_set!(A a, B b);
impl_component_set!(A a, B b, C c);
impl_component_set!(A a, B b, C c, D d);
impl_component_set!(A a, B b, C c, D d, E e);
impl_component_set!(A a, B b, C c, D d, E e, F f);
impl_component_set!(A a, B b, C c, D d, E e, F f, G g);
impl_component_set!(A a, B b, C c, D d, E e, F f, G g, H h);

/// The entity handle passed to [`apply_to_each`](crate::EcsEngine::apply_to_each)
/// callbacks next to the component references.
#[derive(Debug)]
pub struct EntityView<'a> {
    pub(crate) id: EntityId,
    pub(crate) deleted: &'a mut bool,
}

impl EntityView<'_> {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        *self.deleted
    }

    pub fn mark_for_deletion(&mut self) {
        *self.deleted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pos(i32, i32);
    struct Vel(i32, i32);
    struct Tag;

    fn entity_with_pos_vel() -> Entity {
        let mut e = Entity::with_id(EntityId(1));
        e.add_component(Pos(1, 2)).unwrap();
        e.add_component(Vel(3, 4)).unwrap();
        e
    }

    #[test]
    fn contained_in_is_a_conjunction() {
        let e = entity_with_pos_vel();
        assert!(<(Pos,)>::contained_in(&e));
        assert!(<(Pos, Vel)>::contained_in(&e));
        assert!(<(Vel, Pos)>::contained_in(&e));
        assert!(!<(Pos, Tag)>::contained_in(&e));
    }

    #[test]
    fn fetch_borrows_each_component() {
        let mut e = entity_with_pos_vel();
        let (pos, vel) = <(Pos, Vel)>::fetch(&mut e.components).unwrap();
        pos.0 += vel.0;
        pos.1 += vel.1;
        let pos = e.get::<Pos>().unwrap();
        assert_eq!((pos.0, pos.1), (4, 6));
    }

    #[test]
    fn fetch_fails_on_missing_or_repeated_types() {
        let mut e = entity_with_pos_vel();
        assert!(<(Pos, Tag)>::fetch(&mut e.components).is_none());
        assert!(<(Pos, Pos)>::fetch(&mut e.components).is_none());
    }

    #[test]
    fn view_flags_deletion() {
        let mut deleted = false;
        let mut view = EntityView {
            id: EntityId(3),
            deleted: &mut deleted,
        };
        assert!(!view.is_deleted());
        view.mark_for_deletion();
        assert_eq!(view.id(), EntityId(3));
        assert!(deleted);
    }
}

//! ECS error types.

use crate::entity::EntityId;

/// Errors raised by component mutation and event subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity already holds a component of this type.
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        entity: EntityId,
        component: &'static str,
    },

    /// The entity holds no component of this type.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    /// The listener was never subscribed to this event type.
    #[error("listener is not subscribed to {event} events")]
    NotSubscribed { event: &'static str },
}

/// Result type alias for ECS operations.
pub type Result<T> = std::result::Result<T, EcsError>;

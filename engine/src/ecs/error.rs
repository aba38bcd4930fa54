//! Contract violations raised by the ECS.
//!
//! Nothing in this core is transient, so nothing is retried. Every variant describes a programming
//! error or an exhausted fixed budget. The `try_*` family of operations hands these back as values;
//! everything else goes through [`fail`], which logs the violation and panics.

use std::fmt;

use log::error;

use crate::ecs::entity::Entity;

/// A violated ECS contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every entity id up to the configured maximum is alive or waiting for a flush.
    EntityCapacity {
        /// The configured maximum entity count.
        capacity: usize,
    },

    /// The entity id does not fit the fixed storage of this world.
    EntityOutOfRange {
        /// The offending entity.
        entity: Entity,
        /// The configured maximum entity count.
        capacity: usize,
    },

    /// The entity is not alive (never spawned, freed, or marked for deletion).
    DeadEntity(Entity),

    /// An entity id was returned to the allocator while every minted id was already free.
    ExcessFree {
        /// The offending entity.
        entity: Entity,
        /// The number of ids minted so far.
        minted: usize,
    },

    /// The entity already holds a component of this type.
    DuplicateComponent {
        /// The offending entity.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The entity does not hold a component of this type.
    MissingComponent {
        /// The offending entity.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The component type was not part of the type list the world was built with.
    UnregisteredComponent(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EntityCapacity { capacity } => {
                write!(f, "entity capacity exhausted: all {capacity} entity ids are in use")
            }
            Error::EntityOutOfRange { entity, capacity } => {
                write!(f, "{entity} is out of range for an entity capacity of {capacity}")
            }
            Error::DeadEntity(entity) => write!(f, "{entity} is not alive"),
            Error::ExcessFree { entity, minted } => write!(
                f,
                "{entity} freed while all {minted} minted entity ids are already free"
            ),
            Error::DuplicateComponent { entity, component } => {
                write!(f, "{entity} already has a {component} component")
            }
            Error::MissingComponent { entity, component } => {
                write!(f, "{entity} has no {component} component")
            }
            Error::UnregisteredComponent(component) => {
                write!(f, "component type {component} is not registered in this world")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Report a contract violation and abort the current operation.
///
/// The violation is logged at error level first so it is visible even when the panic is caught or
/// the process is configured to abort.
#[cold]
#[track_caller]
pub(crate) fn fail(err: Error) -> ! {
    error!("Assertion failure: {err}");
    panic!("{err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_entity_and_component() {
        // Given
        let err = Error::MissingComponent {
            entity: Entity::from(7),
            component: "Position",
        };

        // When
        let message = err.to_string();

        // Then
        assert_eq!(message, "Entity(7) has no Position component");
    }

    #[test]
    fn display_capacity() {
        // Given
        let err = Error::EntityCapacity { capacity: 3 };

        // Then
        assert_eq!(
            err.to_string(),
            "entity capacity exhausted: all 3 entity ids are in use"
        );
    }

    #[test]
    fn display_excess_free() {
        // Given
        let err = Error::ExcessFree {
            entity: Entity::from(4),
            minted: 2,
        };

        // Then
        assert_eq!(
            err.to_string(),
            "Entity(4) freed while all 2 minted entity ids are already free"
        );
    }

    #[test]
    #[should_panic(expected = "Entity(1) is not alive")]
    fn fail_panics_with_the_message() {
        fail(Error::DeadEntity(Entity::from(1)));
    }
}

use std::marker::PhantomData;

use log::info;

use crate::ecs::{
    component::{self, Set},
    entity,
    world::{Config, World},
};

/// Assembles a [`World`] with a fixed component type list.
///
/// Component types are registered in call order, which fixes their ids and signature bits. Once
/// built, the type list cannot change.
///
/// ```rust,ignore
/// let world = World::builder()
///     .max_entities(1024)
///     .register::<(Position, Velocity)>()
///     .register::<Health>()
///     .build();
/// ```
#[derive(Default)]
pub struct Builder {
    config: Config,
    registrations: Vec<fn(&mut component::Registry)>,
}

impl Builder {
    /// Start from the default [`Config`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit [`Config`].
    #[inline]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            registrations: Vec::new(),
        }
    }

    /// Set the maximum number of stored entities.
    #[inline]
    pub fn max_entities(mut self, max_entities: usize) -> Self {
        self.config.max_entities = max_entities;
        self
    }

    /// Register every component type in `S`. Registering a type twice keeps its first id.
    #[inline]
    pub fn register<S: Set>(mut self) -> Self {
        self.registrations.push(S::register);
        self
    }

    /// Allocate all storage and produce the world.
    pub fn build(self) -> World {
        let capacity = self.config.max_entities;

        let mut components = component::Registry::new(capacity);
        for register in &self.registrations {
            register(&mut components);
        }

        let entities = entity::Registry::new(capacity, components.len());
        let allocator = entity::Allocator::new(capacity);

        info!(
            "Built world: {} max entities, {} component types",
            capacity,
            components.len()
        );

        World {
            config: self.config,
            allocator,
            entities,
            components,
            _not_send: PhantomData,
        }
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sparse_macros::Component;

    use super::*;

    #[derive(Component)]
    struct Position;

    #[derive(Component)]
    struct Velocity;

    #[derive(Component)]
    struct Health;

    #[test]
    fn build_registers_in_call_order() {
        // Given
        let builder = Builder::new()
            .max_entities(32)
            .register::<(Position, Velocity)>()
            .register::<Health>();

        // When
        let world = builder.build();

        // Then
        assert_eq!(world.capacity(), 32);
        assert_eq!(world.components().len(), 3);
        assert_eq!(world.component_id::<Position>(), component::Id::new(0));
        assert_eq!(world.component_id::<Velocity>(), component::Id::new(1));
        assert_eq!(world.component_id::<Health>(), component::Id::new(2));
    }

    #[test]
    fn duplicate_registration_keeps_first_id() {
        // Given
        let builder = Builder::new()
            .register::<Velocity>()
            .register::<(Position, Velocity)>();

        // When
        let world = builder.build();

        // Then
        assert_eq!(world.components().len(), 2);
        assert_eq!(world.component_id::<Velocity>(), component::Id::new(0));
        assert_eq!(world.component_id::<Position>(), component::Id::new(1));
    }

    #[test]
    fn default_builder_uses_default_config() {
        // When
        let world = Builder::new().build();

        // Then
        assert_eq!(world.config(), &Config::default());
        assert!(world.components().is_empty());
    }
}

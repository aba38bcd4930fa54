//! The World is the single container for all entities and components in the ECS.
//!
//! A `World` owns the entity id allocator, the signature array, and one sparse-set table per
//! registered component type. All of it is sized once by the [`Builder`] and never grows.
//!
//! # Architecture
//!
//! The World coordinates three subsystems:
//! - **Entity Allocator**: hands out entity ids, reusing freed ids last-in first-out
//! - **Entity Registry**: the contiguous signature array, partitioned into alive and marked slots
//! - **Component Registry**: the fixed list of component types and their tables
//!
//! # Lifecycle
//!
//! ```text
//!  Free ──spawn──▶ Alive ──mark_for_deletion──▶ Marked ──flush──▶ Free
//! ```
//!
//! Marking is O(1) and only moves the entity's signature past the alive boundary, so it drops out
//! of queries immediately. Its components stay in their tables until the next [`World::flush`],
//! which removes them from every table and recycles the id. A frame loop is expected to run
//! input, update, flush and render in that order.
//!
//! # Example
//!
//! ```ignore
//! use sparse_engine::ecs::world::World;
//!
//! let mut world = World::builder().register::<(Position, Velocity)>().build();
//!
//! let entity = world.spawn();
//! world.add_component(entity, Position { x: 0.0, y: 0.0 });
//! world.add_component(entity, Velocity { x: 1.0, y: 0.0 });
//!
//! let movers: Vec<_> = world.query::<(Position, Velocity)>().into_iter().collect();
//! for entity in movers {
//!     let dx = world.get::<Velocity>(entity).x;
//!     world.get_mut::<Position>(entity).x += dx;
//! }
//!
//! world.mark_for_deletion(entity);
//! world.flush();
//! ```
mod builder;
mod config;

use std::marker::PhantomData;

use log::{debug, warn};

use crate::ecs::{
    component::{self, Component, Set},
    entity::{self, Entity},
    error::{self, Error},
    query::Query,
    signature::Signature,
};

pub use builder::Builder;
pub use config::{Config, DEFAULT_MAX_ENTITIES};

/// The World is the central container for all entities, components, and their relationships.
pub struct World {
    /// The fixed sizing the world was built with.
    config: Config,

    /// The world's entity id allocator.
    allocator: entity::Allocator,

    /// Entity signatures, partitioned into alive and marked.
    entities: entity::Registry,

    /// The registered component types and their tables.
    components: component::Registry,

    /// Marker to make World !Send. World must stay on the thread that owns the frame loop.
    _not_send: PhantomData<*mut ()>,
}

impl World {
    /// Start building a world.
    #[inline]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Build a world with the default config and the component types in `S`.
    #[inline]
    pub fn with_components<S: Set>() -> Self {
        Builder::new().register::<S>().build()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The maximum number of stored entities.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.max_entities
    }

    /// The number of alive entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity is alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The number of entities marked for deletion and waiting for a flush.
    #[inline]
    pub fn marked_len(&self) -> usize {
        self.entities.marked_len()
    }

    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    #[inline]
    pub fn entities(&self) -> &entity::Registry {
        &self.entities
    }

    #[inline]
    pub fn allocator(&self) -> &entity::Allocator {
        &self.allocator
    }

    /// Create an entity with an empty signature, reusing the most recently freed id if any.
    ///
    /// # Panics
    /// - If `max_entities` entities are already stored.
    #[track_caller]
    pub fn spawn(&mut self) -> Entity {
        match self.try_spawn() {
            Ok(entity) => entity,
            Err(err) => error::fail(err),
        }
    }

    /// Create an entity, reporting exhausted capacity instead of panicking.
    pub fn try_spawn(&mut self) -> Result<Entity, Error> {
        let entity = self.allocator.alloc()?;
        self.entities.insert(entity);
        Ok(entity)
    }

    /// Determine if the entity is alive. Entities marked for deletion are not.
    #[inline]
    pub fn exists(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Determine if the entity is marked for deletion and waiting for a flush.
    #[inline]
    pub fn is_marked(&self, entity: Entity) -> bool {
        self.entities.is_marked(entity)
    }

    /// Get the signature of a stored (alive or marked) entity.
    #[inline]
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        self.entities.signature(entity)
    }

    /// Get the id of component type `C`.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn component_id<C: Component>(&self) -> component::Id {
        self.components.id::<C>()
    }

    /// Attach a component to an alive entity and set its signature bit. Returns the stored value.
    ///
    /// # Panics
    /// - If the entity is not alive.
    /// - If `C` is not registered.
    /// - If the entity already holds a `C`.
    #[track_caller]
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> &mut C {
        match self.try_add_component(entity, value) {
            Ok(value) => value,
            Err(err) => error::fail(err),
        }
    }

    /// Attach a component to an alive entity, reporting a violated precondition instead of
    /// panicking. Nothing changes on error.
    pub fn try_add_component<C: Component>(
        &mut self,
        entity: Entity,
        value: C,
    ) -> Result<&mut C, Error> {
        if !self.entities.is_alive(entity) {
            return Err(Error::DeadEntity(entity));
        }
        let id = self.components.try_id::<C>()?;
        let value = self.components.try_table_mut::<C>()?.try_insert(entity, value)?;

        if let Some(signature) = self.entities.signature_mut(entity) {
            signature.add(id);
        }
        Ok(value)
    }

    /// Detach a component from an entity and clear its signature bit, returning the value.
    ///
    /// A no-op returning `None` if the entity does not hold a `C`. Works on entities waiting for a
    /// flush as well as alive ones.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[track_caller]
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let id = self.components.id::<C>();
        match self.entities.signature_mut(entity) {
            Some(signature) => signature.remove(id),
            None => warn!(
                "Removing {} from {entity}, which is not stored",
                std::any::type_name::<C>()
            ),
        }
        self.components.table_mut::<C>().remove(entity)
    }

    /// Determine if a stored entity holds a `C`, by its signature. Entities marked for deletion
    /// keep their signature until the next flush.
    ///
    /// # Panics
    /// - If the entity is neither alive nor marked.
    /// - If `C` is not registered.
    #[track_caller]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        let id = self.components.id::<C>();
        match self.entities.signature(entity) {
            Some(signature) => signature.has(id),
            None => error::fail(Error::DeadEntity(entity)),
        }
    }

    /// Get an entity's component.
    ///
    /// # Panics
    /// - If `C` is not registered.
    /// - If the entity does not hold a `C`.
    #[inline]
    #[track_caller]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        self.components.table::<C>().get(entity)
    }

    /// Get an entity's component mutably.
    ///
    /// # Panics
    /// - If `C` is not registered.
    /// - If the entity does not hold a `C`.
    #[inline]
    #[track_caller]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        self.components.table_mut::<C>().get_mut(entity)
    }

    /// Get an entity's component, if it holds one.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.components.table::<C>().try_get(entity)
    }

    /// Get an entity's component mutably, if it holds one.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn try_get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.table_mut::<C>().try_get_mut(entity)
    }

    /// Mark an alive entity for deletion. It stops being alive and matching queries at once, but
    /// keeps its components until the next [`World::flush`].
    ///
    /// Returns `false`, changing nothing, if the entity is already marked or not alive.
    #[inline]
    pub fn mark_for_deletion(&mut self, entity: Entity) -> bool {
        self.entities.mark(entity)
    }

    /// Purge every marked entity: remove it from every component table and recycle its id.
    /// Returns the number of entities purged.
    pub fn flush(&mut self) -> usize {
        if self.entities.marked_len() == 0 {
            return 0;
        }

        let mut removed = 0;
        for signature in self.entities.marked() {
            let entity = signature.entity();
            removed += self.components.remove_entity_from_all(entity);
            self.allocator.free(entity);
        }
        let purged = self.entities.truncate_marked();

        debug!("Flushed {purged} entities ({removed} components)");
        purged
    }

    /// Iterate every stored `C` in dense order. No filtering: components of marked entities are
    /// included until the next flush.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn iter<C: Component>(&self) -> std::slice::Iter<'_, C> {
        self.components.table::<C>().values().iter()
    }

    /// Iterate every stored `C` mutably in dense order.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn iter_mut<C: Component>(&mut self) -> std::slice::IterMut<'_, C> {
        self.components.table_mut::<C>().values_mut().iter_mut()
    }

    /// The entities holding a `C`, in the same dense order as [`World::iter`].
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn entities_with<C: Component>(&self) -> &[Entity] {
        self.components.table::<C>().entities()
    }

    /// Get the table of component type `C`.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn table<C: Component>(&self) -> &component::Table<C> {
        self.components.table::<C>()
    }

    /// Query the alive entities holding every component in `S`.
    ///
    /// # Panics
    /// - If any type in `S` is not registered.
    #[inline]
    #[track_caller]
    pub fn query<S: Set>(&self) -> Query<'_> {
        Query::new(self.entities.alive(), S::mask(&self.components))
    }

    /// Remove every `C` from the world and clear its bit in every signature.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[track_caller]
    pub fn clear_component<C: Component>(&mut self) {
        let id = self.components.id::<C>();
        self.components.clear_by_id(id);
        self.entities.remove_from_all(id);
    }
}

impl Default for World {
    fn default() -> Self {
        Builder::new().build()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("alive", &self.entities.len())
            .field("marked", &self.entities.marked_len())
            .field("components", &self.components)
            .finish()
    }
}

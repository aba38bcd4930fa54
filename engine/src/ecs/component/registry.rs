use std::{
    any::{TypeId, type_name},
    collections::HashMap,
};

use crate::ecs::{
    component::{Component, Id, Table, table::ErasedTable},
    entity::Entity,
    error::{self, Error},
    signature::Mask,
};

/// A registered component type: its name for diagnostics and its type-erased table.
struct Entry {
    name: &'static str,
    table: Box<dyn ErasedTable>,
}

/// The component type registry.
///
/// Maps each component type of the world's fixed type list to a dense [`Id`] and to the one
/// [`Table`] that stores it. Ids are assigned in registration order and never change, so they can
/// index signature bits directly. Tables are allocated at registration for the full entity
/// capacity.
///
/// Asking for a type that was never registered is a programming error: the panicking accessors
/// fail fast, the `try_*` accessors return [`Error::UnregisteredComponent`].
pub struct Registry {
    /// Map from the Rust type to its component id.
    type_map: HashMap<TypeId, Id>,

    /// Tables, indexed by component id.
    entries: Vec<Entry>,

    /// The entity capacity every table is allocated for.
    capacity: usize,
}

impl Registry {
    /// Create an empty registry whose tables hold entity ids below `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            type_map: HashMap::new(),
            entries: Vec::new(),
            capacity,
        }
    }

    /// Register a component type and get its id.
    ///
    /// Registering the same type again returns the existing id.
    pub fn register<C: Component>(&mut self) -> Id {
        let type_id = TypeId::of::<C>();
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        let id = Id::from(self.entries.len());
        self.entries.push(Entry {
            name: type_name::<C>(),
            table: Box::new(Table::<C>::new(self.capacity)),
        });
        self.type_map.insert(type_id, id);
        id
    }

    /// The number of registered component types, which is also the signature width.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no component type is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entity capacity of every table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the id of component type `C`.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[inline]
    #[track_caller]
    pub fn id<C: Component>(&self) -> Id {
        match self.try_id::<C>() {
            Ok(id) => id,
            Err(err) => error::fail(err),
        }
    }

    /// Get the id of component type `C`, if registered.
    #[inline]
    pub fn try_id<C: Component>(&self) -> Result<Id, Error> {
        self.type_map
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(Error::UnregisteredComponent(type_name::<C>()))
    }

    /// Get the type name of a registered component id.
    #[inline]
    pub fn name(&self, id: Id) -> Option<&'static str> {
        self.entries.get(id.index()).map(|entry| entry.name)
    }

    /// Get the table of component type `C`.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[track_caller]
    pub fn table<C: Component>(&self) -> &Table<C> {
        match self.try_table::<C>() {
            Ok(table) => table,
            Err(err) => error::fail(err),
        }
    }

    /// Get the table of component type `C` mutably.
    ///
    /// # Panics
    /// - If `C` is not registered.
    #[track_caller]
    pub fn table_mut<C: Component>(&mut self) -> &mut Table<C> {
        match self.try_table_mut::<C>() {
            Ok(table) => table,
            Err(err) => error::fail(err),
        }
    }

    /// Get the table of component type `C`, if registered.
    pub fn try_table<C: Component>(&self) -> Result<&Table<C>, Error> {
        let id = self.try_id::<C>()?;
        self.entries[id.index()]
            .table
            .as_any()
            .downcast_ref::<Table<C>>()
            .ok_or(Error::UnregisteredComponent(type_name::<C>()))
    }

    /// Get the table of component type `C` mutably, if registered.
    pub fn try_table_mut<C: Component>(&mut self) -> Result<&mut Table<C>, Error> {
        let id = self.try_id::<C>()?;
        self.entries[id.index()]
            .table
            .as_any_mut()
            .downcast_mut::<Table<C>>()
            .ok_or(Error::UnregisteredComponent(type_name::<C>()))
    }

    /// Remove `entity` from every registered table that holds it. Returns how many components
    /// were removed.
    pub fn remove_entity_from_all(&mut self, entity: Entity) -> usize {
        self.entries
            .iter_mut()
            .map(|entry| entry.table.remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Collect the ids of every table currently holding `entity`, as a mask.
    ///
    /// This reads the tables themselves rather than any signature, so it reflects physical
    /// storage.
    pub fn stored_mask(&self, entity: Entity) -> Mask {
        let mut mask = self.empty_mask();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.table.contains(entity) {
                mask.insert(Id::from(index));
            }
        }
        mask
    }

    /// Empty every table. Capacity is kept.
    pub fn clear_all(&mut self) {
        for entry in &mut self.entries {
            entry.table.clear();
        }
    }

    /// Clear the table behind a component id.
    pub(crate) fn clear_by_id(&mut self, id: Id) {
        if let Some(entry) = self.entries.get_mut(id.index()) {
            entry.table.clear();
        }
    }

    /// The total number of stored components across all tables.
    pub fn component_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.table.len()).sum()
    }

    /// An empty mask as wide as the registry.
    #[inline]
    pub fn empty_mask(&self) -> Mask {
        Mask::with_width(self.entries.len())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("capacity", &self.capacity)
            .field(
                "components",
                &self.entries.iter().map(|entry| entry.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sparse_macros::Component;

    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Position(i32);

    #[derive(Component, Debug, PartialEq)]
    struct Velocity(i32);

    #[derive(Component, Debug)]
    struct Mana;

    #[test]
    fn component_registration() {
        // Given
        let mut registry = Registry::new(16);

        // When
        let pos_id = registry.register::<Position>();
        let vel_id = registry.register::<Velocity>();

        // Then
        assert_eq!(pos_id, Id::new(0));
        assert_eq!(vel_id, Id::new(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id::<Position>(), pos_id);
        assert_eq!(registry.id::<Velocity>(), vel_id);

        // Then - Registering the same type again should result in the same id
        assert_eq!(registry.register::<Position>(), pos_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregistered_lookup() {
        // Given
        let mut registry = Registry::new(16);
        registry.register::<Position>();

        // When
        let result = registry.try_id::<Mana>();

        // Then
        assert!(matches!(result, Err(Error::UnregisteredComponent(name)) if name.ends_with("Mana")));
        assert!(registry.try_table::<Mana>().is_err());
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unregistered_table_fails_fast() {
        // Given
        let registry = Registry::new(16);

        // When
        registry.table::<Mana>();
    }

    #[test]
    fn tables_are_typed_and_sized() {
        // Given
        let mut registry = Registry::new(8);
        registry.register::<Position>();

        // When
        registry
            .table_mut::<Position>()
            .insert(Entity::new(7), Position(3));

        // Then
        assert_eq!(registry.table::<Position>().capacity(), 8);
        assert_eq!(registry.table::<Position>().get(Entity::new(7)), &Position(3));
        assert!(registry.name(Id::new(0)).unwrap().ends_with("Position"));
        assert_eq!(registry.name(Id::new(5)), None);
    }

    #[test]
    fn remove_entity_from_all_sweeps_every_table() {
        // Given
        let mut registry = Registry::new(8);
        registry.register::<Position>();
        registry.register::<Velocity>();
        registry.register::<Mana>();
        let entity = Entity::new(2);
        let other = Entity::new(3);
        registry.table_mut::<Position>().insert(entity, Position(1));
        registry.table_mut::<Velocity>().insert(entity, Velocity(2));
        registry.table_mut::<Velocity>().insert(other, Velocity(5));

        // When
        let removed = registry.remove_entity_from_all(entity);

        // Then
        assert_eq!(removed, 2);
        assert!(registry.stored_mask(entity).is_clear());
        assert_eq!(registry.table::<Velocity>().get(other), &Velocity(5));
        assert_eq!(registry.component_count(), 1);

        // When - a second sweep finds nothing
        let removed = registry.remove_entity_from_all(entity);

        // Then
        assert_eq!(removed, 0);
        assert_eq!(registry.component_count(), 1);
    }

    #[test]
    fn stored_mask_reflects_tables() {
        // Given
        let mut registry = Registry::new(8);
        let pos = registry.register::<Position>();
        let vel = registry.register::<Velocity>();
        let entity = Entity::new(1);
        registry.table_mut::<Velocity>().insert(entity, Velocity(0));

        // When
        let mask = registry.stored_mask(entity);

        // Then
        assert!(mask.contains(vel));
        assert!(!mask.contains(pos));
        assert_eq!(mask.width(), 2);
    }

    #[test]
    fn clear_all_empties_tables() {
        // Given
        let mut registry = Registry::new(4);
        registry.register::<Position>();
        registry.register::<Velocity>();
        registry.table_mut::<Position>().insert(Entity::new(0), Position(0));
        registry.table_mut::<Velocity>().insert(Entity::new(0), Velocity(0));

        // When
        registry.clear_all();

        // Then
        assert_eq!(registry.component_count(), 0);
        assert!(!registry.is_empty());
    }
}

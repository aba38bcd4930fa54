use std::any::{Any, type_name};

use crate::ecs::{
    component::Component,
    entity::Entity,
    error::{self, Error},
};

/// Sparse-set storage for one component type.
///
/// ```text
///  sparse (by entity id)      dense (entity ids)      values
///  ┌───┬───┬───┬───┬───┐      ┌───┬───┬───┐           ┌────┬────┬────┐
///  │ 2 │ · │ 0 │ · │ 1 │      │ 2 │ 4 │ 0 │           │ v2 │ v4 │ v0 │
///  └───┴───┴───┴───┴───┘      └───┴───┴───┘           └────┴────┴────┘
/// ```
///
/// `values[i]` belongs to `dense[i]`, and for every entity `e` in the table
/// `dense[sparse[e]] == e`. Sparse entries of entities without the component are stale and are
/// only ever read behind that equality check. Removal swaps the last dense slot into the hole, so
/// dense order is not stable across removals.
///
/// All three arrays are allocated for the full capacity on construction. Any insert or remove
/// invalidates outstanding slices returned by [`Table::values`] or [`Table::entities`]; the
/// borrow checker enforces this.
#[derive(Debug)]
pub struct Table<C> {
    /// Entity id to dense slot. Length is the entity capacity.
    sparse: Box<[u32]>,

    /// The owner of each dense slot.
    dense: Vec<Entity>,

    /// The component values, aligned with `dense`.
    values: Vec<C>,
}

impl<C: Component> Table<C> {
    /// Construct an empty table for entity ids below `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            sparse: vec![0; capacity].into_boxed_slice(),
            dense: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// The number of entities this table can hold (and the exclusive upper bound of their ids).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// The number of entities holding this component.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns true if no entity holds this component.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Determine if `entity` holds this component. Never panics, whatever the entity id.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Attach a value to `entity`, returning a reference to the stored value.
    ///
    /// # Panics
    /// - If the entity id is outside the table capacity.
    /// - If the entity already holds this component.
    #[track_caller]
    pub fn insert(&mut self, entity: Entity, value: C) -> &mut C {
        match self.try_insert(entity, value) {
            Ok(value) => value,
            Err(err) => error::fail(err),
        }
    }

    /// Attach a value to `entity`, reporting a violated precondition instead of panicking.
    pub fn try_insert(&mut self, entity: Entity, value: C) -> Result<&mut C, Error> {
        let index = entity.index();
        if index >= self.sparse.len() {
            return Err(Error::EntityOutOfRange {
                entity,
                capacity: self.sparse.len(),
            });
        }
        if self.contains(entity) {
            return Err(Error::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }
        // Every in-range id holds at most one slot, so dense storage can never outgrow the
        // capacity reserved up front.
        let slot = self.dense.len();
        self.sparse[index] = slot as u32;
        self.dense.push(entity);
        self.values.push(value);
        Ok(&mut self.values[slot])
    }

    /// Detach the component from `entity`, returning the value. A no-op returning `None` if the
    /// entity does not hold it.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.slot(entity)?;
        let last = self.dense.len() - 1;

        self.dense.swap_remove(slot);
        let value = self.values.swap_remove(slot);

        // The previous last entity now lives in the vacated slot.
        if slot != last {
            let moved = self.dense[slot];
            self.sparse[moved.index()] = slot as u32;
        }
        Some(value)
    }

    /// Get the component of `entity`.
    ///
    /// # Panics
    /// - If the entity does not hold this component.
    #[track_caller]
    pub fn get(&self, entity: Entity) -> &C {
        match self.try_get(entity) {
            Some(value) => value,
            None => error::fail(self.missing(entity)),
        }
    }

    /// Get the component of `entity` mutably.
    ///
    /// # Panics
    /// - If the entity does not hold this component.
    #[track_caller]
    pub fn get_mut(&mut self, entity: Entity) -> &mut C {
        let Some(slot) = self.slot(entity) else {
            error::fail(self.missing(entity));
        };
        &mut self.values[slot]
    }

    /// Get the component of `entity`, if present.
    #[inline]
    pub fn try_get(&self, entity: Entity) -> Option<&C> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    /// Get the component of `entity` mutably, if present.
    #[inline]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.slot(entity).map(|slot| &mut self.values[slot])
    }

    /// The live component values, in dense order.
    #[inline]
    pub fn values(&self) -> &[C] {
        &self.values
    }

    /// The live component values, in dense order, mutably.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [C] {
        &mut self.values
    }

    /// The entities holding this component, aligned with [`Table::values`].
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.dense
    }

    /// Iterate `(entity, value)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Entity, &C)> + '_ {
        self.dense.iter().copied().zip(self.values.iter())
    }

    /// Iterate `(entity, value)` pairs in dense order, with mutable values.
    #[inline]
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = (Entity, &mut C)> + '_ {
        self.dense.iter().copied().zip(self.values.iter_mut())
    }

    /// Remove every component from the table. Capacity is kept; sparse entries are left stale.
    #[inline]
    pub fn clear(&mut self) {
        self.dense.clear();
        self.values.clear();
    }

    /// The dense slot of `entity`, guarded against stale sparse entries.
    #[inline]
    fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(entity.index())? as usize;
        (slot < self.dense.len() && self.dense[slot] == entity).then_some(slot)
    }

    #[cold]
    fn missing(&self, entity: Entity) -> Error {
        Error::MissingComponent {
            entity,
            component: type_name::<C>(),
        }
    }
}

/// Type-erased view of a [`Table`], letting the registry sweep tables without knowing their
/// component types.
pub(crate) trait ErasedTable: Any {
    /// Remove the entity's component, if present. Returns true if something was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Determine if the entity holds this table's component.
    fn contains(&self, entity: Entity) -> bool;

    /// Remove every component.
    fn clear(&mut self);

    /// The number of stored components.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedTable for Table<C> {
    #[inline]
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    #[inline]
    fn contains(&self, entity: Entity) -> bool {
        Table::contains(self, entity)
    }

    #[inline]
    fn clear(&mut self) {
        Table::clear(self);
    }

    #[inline]
    fn len(&self) -> usize {
        Table::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

use log::trace;

use crate::ecs::{
    component,
    entity::Entity,
    error::{self, Error},
    signature::Signature,
};

/// The collection of all entity signatures in the world.
///
/// Signatures are stored contiguously and partitioned in two:
///
/// ```text
///  signatures: [ alive ......................... | marked ....... | unused ... ]
///               0                    len() ──────┘      count ─────┘   capacity
/// ```
///
/// Alive entities occupy `[0, count - marked)` and entities waiting for a flush occupy the tail
/// `[count - marked, count)`. Marking swaps an entity's slot to the partition boundary, so both
/// marking and membership checks are O(1). `indices` maps an entity id to its slot; entries of
/// entities that are no longer stored are stale and only read behind a slot-owner check.
///
/// Every signature slot is allocated when the registry is constructed and reused afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Signature slots. Only the first `count` are meaningful.
    signatures: Vec<Signature>,

    /// Entity id to slot.
    indices: Box<[u32]>,

    /// The number of stored signatures (alive and marked).
    count: usize,

    /// The number of stored signatures in the marked tail.
    marked: usize,
}

impl Registry {
    /// Construct a registry for `capacity` entities with signatures `width` component types wide.
    pub fn new(capacity: usize, width: usize) -> Self {
        Self {
            signatures: (0..capacity)
                .map(|_| Signature::new(Entity::default(), width))
                .collect(),
            indices: vec![0; capacity].into_boxed_slice(),
            count: 0,
            marked: 0,
        }
    }

    /// The maximum number of stored signatures.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }

    /// The number of alive entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.count - self.marked
    }

    /// Returns true if no entity is alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of entities waiting for a flush.
    #[inline]
    pub fn marked_len(&self) -> usize {
        self.marked
    }

    /// The signatures of alive entities, in slot order.
    #[inline]
    pub fn alive(&self) -> &[Signature] {
        &self.signatures[..self.len()]
    }

    /// The signatures of entities marked for deletion, in slot order.
    #[inline]
    pub fn marked(&self) -> &[Signature] {
        &self.signatures[self.len()..self.count]
    }

    /// Store a cleared signature for a freshly allocated entity and return its slot.
    ///
    /// When entities are currently marked, the new signature is swapped in front of the marked
    /// tail so it lands in the alive range.
    ///
    /// # Panics
    /// - If the entity id is outside the capacity or every slot is in use.
    pub fn insert(&mut self, entity: Entity) -> usize {
        if entity.index() >= self.indices.len() || self.count == self.signatures.len() {
            error::fail(Error::EntityOutOfRange {
                entity,
                capacity: self.signatures.len(),
            });
        }

        let boundary = self.len();
        let slot = self.count;
        self.signatures[slot].reset(entity);
        self.indices[entity.index()] = slot as u32;
        self.count += 1;

        if slot != boundary {
            self.swap_slots(boundary, slot);
        }
        boundary
    }

    /// The slot of a stored (alive or marked) entity.
    #[inline]
    pub fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = *self.indices.get(entity.index())? as usize;
        (slot < self.count && self.signatures[slot].entity() == entity).then_some(slot)
    }

    /// Determine if the entity is alive, i.e. stored and not marked for deletion.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity).is_some_and(|slot| slot < self.len())
    }

    /// Determine if the entity is marked for deletion and waiting for a flush.
    #[inline]
    pub fn is_marked(&self, entity: Entity) -> bool {
        self.slot(entity).is_some_and(|slot| slot >= self.len())
    }

    /// Get the signature of a stored (alive or marked) entity.
    #[inline]
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        self.slot(entity).map(|slot| &self.signatures[slot])
    }

    /// Get the signature of a stored (alive or marked) entity mutably.
    #[inline]
    pub fn signature_mut(&mut self, entity: Entity) -> Option<&mut Signature> {
        self.slot(entity).map(|slot| &mut self.signatures[slot])
    }

    /// Move an alive entity into the marked tail. Returns `false`, changing nothing, if the entity
    /// is not alive (already marked, or not stored at all).
    pub fn mark(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.slot(entity) else {
            trace!("ignoring mark of {entity}: not stored");
            return false;
        };
        let boundary = self.len();
        if slot >= boundary {
            trace!("ignoring mark of {entity}: already marked");
            return false;
        }

        let last_alive = boundary - 1;
        if slot != last_alive {
            self.swap_slots(slot, last_alive);
        }
        self.marked += 1;
        true
    }

    /// Drop every marked signature and return how many were dropped.
    pub fn truncate_marked(&mut self) -> usize {
        let marked = self.marked;
        self.count -= marked;
        self.marked = 0;
        marked
    }

    /// Clear a component bit in every stored signature.
    pub fn remove_from_all(&mut self, id: component::Id) {
        for signature in &mut self.signatures[..self.count] {
            signature.remove(id);
        }
    }

    /// Exchange two signature slots, keeping `indices` in step.
    #[inline]
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.signatures.swap(a, b);
        self.indices[self.signatures[a].entity().index()] = a as u32;
        self.indices[self.signatures[b].entity().index()] = b as u32;
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::{
        component,
        entity::{Entity, Registry},
    };

    fn entities(registry: &Registry) -> Vec<Entity> {
        registry.alive().iter().map(|s| s.entity()).collect()
    }

    fn marked(registry: &Registry) -> Vec<Entity> {
        registry.marked().iter().map(|s| s.entity()).collect()
    }

    /// Assert every stored entity's index points back at its own slot.
    fn assert_indexed(registry: &Registry) {
        for (slot, signature) in registry.signatures[..registry.count].iter().enumerate() {
            assert_eq!(registry.slot(signature.entity()), Some(slot));
        }
    }

    #[test]
    fn entity_insert_check() {
        // Given
        let mut registry = Registry::new(4, 2);
        let entity = Entity::new(0);

        // Then - not stored yet
        assert!(!registry.is_alive(entity));

        // When
        let slot = registry.insert(entity);

        // Then
        assert_eq!(slot, 0);
        assert!(registry.is_alive(entity));
        assert!(!registry.is_marked(entity));
        assert!(registry.signature(entity).unwrap().mask().is_clear());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn mark_swaps_to_the_boundary() {
        // Given
        let mut registry = Registry::new(4, 1);
        for id in 0..3 {
            registry.insert(Entity::new(id));
        }

        // When
        assert!(registry.mark(Entity::new(0)));

        // Then
        assert_eq!(entities(&registry), vec![Entity::new(2), Entity::new(1)]);
        assert_eq!(marked(&registry), vec![Entity::new(0)]);
        assert!(!registry.is_alive(Entity::new(0)));
        assert!(registry.is_marked(Entity::new(0)));
        assert_indexed(&registry);

        // When - a second mark lands in front of the first
        assert!(registry.mark(Entity::new(2)));

        // Then
        assert_eq!(entities(&registry), vec![Entity::new(1)]);
        assert_eq!(marked(&registry), vec![Entity::new(2), Entity::new(0)]);
        assert_indexed(&registry);
    }

    #[test]
    fn mark_is_idempotent() {
        // Given
        let mut registry = Registry::new(4, 1);
        registry.insert(Entity::new(0));
        registry.insert(Entity::new(1));
        registry.mark(Entity::new(0));

        // When
        let again = registry.mark(Entity::new(0));
        let unknown = registry.mark(Entity::new(3));

        // Then
        assert!(!again);
        assert!(!unknown);
        assert_eq!(registry.marked_len(), 1);
        assert_eq!(entities(&registry), vec![Entity::new(1)]);
    }

    #[test]
    fn mark_keeps_the_signature() {
        // Given
        let mut registry = Registry::new(2, 2);
        registry.insert(Entity::new(0));
        registry.insert(Entity::new(1));
        registry
            .signature_mut(Entity::new(0))
            .unwrap()
            .add(component::Id::new(1));

        // When
        registry.mark(Entity::new(0));

        // Then
        let signature = registry.signature(Entity::new(0)).unwrap();
        assert!(signature.has(component::Id::new(1)));
    }

    #[test]
    fn insert_while_marked_stays_alive() {
        // Given
        let mut registry = Registry::new(4, 1);
        registry.insert(Entity::new(0));
        registry.insert(Entity::new(1));
        registry.mark(Entity::new(0));

        // When
        let slot = registry.insert(Entity::new(2));

        // Then
        assert_eq!(slot, 1);
        assert!(registry.is_alive(Entity::new(2)));
        assert_eq!(entities(&registry), vec![Entity::new(1), Entity::new(2)]);
        assert_eq!(marked(&registry), vec![Entity::new(0)]);
        assert_indexed(&registry);
    }

    #[test]
    fn truncate_drops_the_marked_tail() {
        // Given
        let mut registry = Registry::new(4, 1);
        for id in 0..3 {
            registry.insert(Entity::new(id));
        }
        registry.mark(Entity::new(1));

        // When
        let dropped = registry.truncate_marked();

        // Then
        assert_eq!(dropped, 1);
        assert_eq!(registry.marked_len(), 0);
        assert!(registry.slot(Entity::new(1)).is_none());
        assert_eq!(entities(&registry), vec![Entity::new(0), Entity::new(2)]);
    }

    #[test]
    fn stale_indices_are_not_trusted() {
        // Given - entity 1 is dropped, then entity 3 takes its old slot.
        let mut registry = Registry::new(4, 1);
        registry.insert(Entity::new(0));
        registry.insert(Entity::new(1));
        registry.mark(Entity::new(1));
        registry.truncate_marked();
        registry.insert(Entity::new(3));

        // Then
        assert!(!registry.is_alive(Entity::new(1)));
        assert!(registry.signature(Entity::new(1)).is_none());
        assert!(registry.is_alive(Entity::new(3)));
        assert!(!registry.is_alive(Entity::new(2)));
    }

    #[test]
    fn out_of_range_entities_are_not_stored() {
        // Given
        let registry = Registry::new(2, 1);

        // Then
        assert!(!registry.is_alive(Entity::new(100)));
        assert!(registry.slot(Entity::new(u32::MAX)).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn insert_past_capacity_fails_fast() {
        // Given
        let mut registry = Registry::new(1, 1);
        registry.insert(Entity::new(0));

        // When
        registry.insert(Entity::new(0));
    }

    #[test]
    fn remove_from_all_clears_bits() {
        // Given
        let mut registry = Registry::new(3, 2);
        let bit = component::Id::new(1);
        for id in 0..3 {
            registry.insert(Entity::new(id));
            registry.signature_mut(Entity::new(id)).unwrap().add(bit);
        }
        registry.mark(Entity::new(2));

        // When
        registry.remove_from_all(bit);

        // Then
        for id in 0..3 {
            assert!(!registry.signature(Entity::new(id)).unwrap().has(bit));
        }
    }
}

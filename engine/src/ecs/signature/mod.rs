//! Per-entity component signatures.
//!
//! Every live entity owns exactly one [`Signature`]: the entity id plus a [`Mask`] with bit N set
//! when the entity holds component id N. Signatures are kept contiguously by the entity
//! [`Registry`](crate::ecs::entity::Registry), and queries walk that array testing each mask for
//! containment of the query's target mask.

mod mask;

pub use mask::Mask;

use crate::ecs::{component, entity::Entity};

/// The component signature of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The components held by the entity.
    mask: Mask,

    /// The owning entity.
    entity: Entity,
}

impl Signature {
    /// Construct an empty signature for `entity` sized for `width` component types.
    #[inline]
    pub fn new(entity: Entity, width: usize) -> Self {
        Self {
            mask: Mask::with_width(width),
            entity,
        }
    }

    /// The owning entity.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The components held by the entity.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Record that the entity holds component `id`.
    #[inline]
    pub fn add(&mut self, id: component::Id) {
        self.mask.insert(id);
    }

    /// Record that the entity no longer holds component `id`.
    #[inline]
    pub fn remove(&mut self, id: component::Id) {
        self.mask.remove(id);
    }

    /// Determine if the entity holds component `id`.
    #[inline]
    pub fn has(&self, id: component::Id) -> bool {
        self.mask.contains(id)
    }

    /// Determine if the entity holds every component of `target`.
    #[inline]
    pub fn matches(&self, target: &Mask) -> bool {
        self.mask.contains_all(target)
    }

    /// Reuse this slot for a new entity, clearing every bit without reallocating.
    #[inline]
    pub(crate) fn reset(&mut self, entity: Entity) {
        self.mask.clear();
        self.entity = entity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: usize) -> component::Id {
        component::Id::from(index)
    }

    #[test]
    fn add_remove_has() {
        // Given
        let mut signature = Signature::new(Entity::new(3), 2);

        // When
        signature.add(id(1));

        // Then
        assert!(signature.has(id(1)));
        assert!(!signature.has(id(0)));

        // When
        signature.remove(id(1));

        // Then
        assert!(!signature.has(id(1)));
        assert!(signature.mask().is_clear());
    }

    #[test]
    fn matches_requires_every_target_bit() {
        // Given
        let mut signature = Signature::new(Entity::new(0), 3);
        signature.add(id(0));
        signature.add(id(2));
        let mut target = Mask::with_width(3);
        target.insert(id(0));

        // Then
        assert!(signature.matches(&target));

        // When
        target.insert(id(1));

        // Then
        assert!(!signature.matches(&target));
    }

    #[test]
    fn reset_keeps_width_and_clears_bits() {
        // Given
        let mut signature = Signature::new(Entity::new(0), 5);
        signature.add(id(4));

        // When
        signature.reset(Entity::new(9));

        // Then
        assert_eq!(signature.entity(), Entity::new(9));
        assert!(signature.mask().is_clear());
        assert_eq!(signature.mask().width(), 5);
    }
}

//! Entity handles and id allocation.
//!
//! An [`Entity`] is nothing but an id. It has no payload of its own; its meaning comes entirely
//! from the components attached to it. Ids are handed out by an [`Allocator`] that prefers
//! recently released ids (LIFO) over minting new ones, which bounds the id space to the live
//! entity high-water mark and keeps the sparse arrays indexed by entity id densely used.
//!
//! # Lifecycle
//!
//! ```text
//! Free ──spawn──▶ Alive ──mark_for_deletion──▶ Marked ──flush──▶ Free
//! ```
//!
//! The signature side of the lifecycle (who is alive, who is marked) is tracked by the
//! [`Registry`]; the allocator only knows which ids are free.
//!
//! # Reuse
//!
//! Entities carry no generation. Once an id has been flushed and handed out again, an old copy
//! of the handle refers to the new entity. Game code that holds on to handles across a flush is
//! expected to drop them when it marks the entity.

mod registry;

use std::fmt;

use crate::ecs::error::{self, Error};

pub use registry::Registry;

/// An entity identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Construct an entity handle from a raw id.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id of this entity.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Entity {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// An allocator for entity ids.
///
/// Ids are minted sequentially from zero until the capacity is reached. Released ids go on a
/// stack and are reused last-in, first-out before any new id is minted. The stack is allocated
/// up front for the full capacity and never grows.
#[derive(Debug)]
pub struct Allocator {
    /// Released ids, most recently released on top.
    free: Vec<Entity>,

    /// The next id that has never been handed out.
    next: u32,

    /// The maximum number of distinct ids.
    capacity: usize,
}

impl Allocator {
    /// Construct an allocator for at most `capacity` distinct ids.
    ///
    /// # Panics
    /// - If `capacity` does not fit in a `u32` id.
    pub fn new(capacity: usize) -> Self {
        assert!(
            u32::try_from(capacity).is_ok(),
            "entity capacity {capacity} does not fit in a u32 id"
        );
        Self {
            free: Vec::with_capacity(capacity),
            next: 0,
            capacity,
        }
    }

    /// Allocate an id, reusing the most recently freed one when available.
    pub fn alloc(&mut self) -> Result<Entity, Error> {
        if let Some(entity) = self.free.pop() {
            return Ok(entity);
        }
        if self.minted() == self.capacity {
            return Err(Error::EntityCapacity {
                capacity: self.capacity,
            });
        }
        let entity = Entity(self.next);
        self.next += 1;
        Ok(entity)
    }

    /// Return an id to the allocator so that it can be handed out again.
    ///
    /// The caller guarantees the id was allocated here and is not freed twice.
    ///
    /// # Panics
    /// - If more ids are freed than were ever minted.
    pub fn free(&mut self, entity: Entity) {
        if self.free.len() == self.minted() {
            error::fail(Error::ExcessFree {
                entity,
                minted: self.minted(),
            });
        }
        self.free.push(entity);
    }

    /// The number of ids waiting to be reused.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// The number of distinct ids handed out so far (the id high-water mark).
    #[inline]
    pub fn minted(&self) -> usize {
        self.next as usize
    }

    /// The maximum number of distinct ids.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently freed id, which the next [`Allocator::alloc`] will return.
    #[inline]
    pub fn peek_free(&self) -> Option<Entity> {
        self.free.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mints_sequential_ids() {
        // Given
        let mut allocator = Allocator::new(4);

        // When
        let first = allocator.alloc().unwrap();
        let second = allocator.alloc().unwrap();

        // Then
        assert_eq!(first, Entity::new(0));
        assert_eq!(second, Entity::new(1));
        assert_eq!(allocator.minted(), 2);
    }

    #[test]
    fn reuses_freed_ids_last_in_first_out() {
        // Given
        let mut allocator = Allocator::new(4);
        let e0 = allocator.alloc().unwrap();
        let e1 = allocator.alloc().unwrap();
        let _e2 = allocator.alloc().unwrap();

        // When
        allocator.free(e0);
        allocator.free(e1);

        // Then
        assert_eq!(allocator.peek_free(), Some(e1));
        assert_eq!(allocator.alloc().unwrap(), e1);
        assert_eq!(allocator.alloc().unwrap(), e0);
        assert_eq!(allocator.alloc().unwrap(), Entity::new(3));
        assert_eq!(allocator.free_len(), 0);
    }

    #[test]
    fn capacity_is_a_hard_limit() {
        // Given
        let mut allocator = Allocator::new(2);
        allocator.alloc().unwrap();
        allocator.alloc().unwrap();

        // When
        let result = allocator.alloc();

        // Then
        assert_eq!(result, Err(Error::EntityCapacity { capacity: 2 }));
    }

    #[test]
    fn freed_ids_make_room_at_capacity() {
        // Given
        let mut allocator = Allocator::new(1);
        let entity = allocator.alloc().unwrap();
        assert!(allocator.alloc().is_err());

        // When
        allocator.free(entity);

        // Then
        assert_eq!(allocator.alloc(), Ok(entity));
    }

    #[test]
    #[should_panic(expected = "Entity(0) freed while all 1 minted entity ids are already free")]
    fn freeing_more_than_minted_fails() {
        // Given
        let mut allocator = Allocator::new(2);
        let entity = allocator.alloc().unwrap();
        allocator.free(entity);

        // When
        allocator.free(entity);
    }

    #[test]
    fn entity_display() {
        assert_eq!(Entity::from(42).to_string(), "Entity(42)");
        assert_eq!(Entity::from(42).index(), 42);
    }
}

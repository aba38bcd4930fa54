//! Signature-filtered entity queries.
//!
//! A [`Query`] pairs the contiguous array of alive signatures with a target [`Mask`] (the OR of
//! the required component bits, computed once). Iterating it walks the array in slot order and
//! yields every entity whose signature contains the whole target.
//!
//! # Usage
//!
//! ```rust,ignore
//! let world = World::builder().register::<(Position, Velocity)>().build();
//!
//! // Entities with both a Position and a Velocity
//! let movers = world.query::<(Position, Velocity)>();
//! for entity in &movers {
//!     let pos = world.get::<Position>(entity);
//! }
//!
//! // The same query can be walked again
//! let count = movers.count();
//! ```
//!
//! # Invalidation
//!
//! A query borrows the world, so the borrow checker rules out structural changes (spawn, add or
//! remove components, mark, flush) while it is alive. Collect the entities first when iteration
//! has to drive mutation.
//!
//! # Order
//!
//! Results follow signature slot order, which is creation order until the first entity is marked
//! for deletion; marking swaps slots.

use std::iter::FusedIterator;

use crate::ecs::{entity::Entity, signature::Mask, signature::Signature};

/// A lazy, restartable view over the alive entities matching a set of required components.
#[derive(Debug, Clone)]
pub struct Query<'w> {
    /// The alive signature prefix.
    signatures: &'w [Signature],

    /// The components every result must hold.
    target: Mask,
}

impl<'w> Query<'w> {
    /// Construct a query over `signatures` requiring every component in `target`.
    #[inline]
    pub(crate) fn new(signatures: &'w [Signature], target: Mask) -> Self {
        Self { signatures, target }
    }

    /// The components every result must hold.
    #[inline]
    pub fn target(&self) -> &Mask {
        &self.target
    }

    /// Iterate the matching entities from the start.
    #[inline]
    pub fn iter(&self) -> Matches<'_> {
        Matches {
            signatures: self.signatures.iter(),
            target: &self.target,
        }
    }

    /// Count the matching entities.
    #[inline]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// The first matching entity in slot order.
    #[inline]
    pub fn first(&self) -> Option<Entity> {
        self.iter().next()
    }

    /// Returns true if no entity matches. An empty result is not an error.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

/// Iterator over the entities matching a [`Query`].
#[derive(Debug, Clone)]
pub struct Matches<'q> {
    signatures: std::slice::Iter<'q, Signature>,
    target: &'q Mask,
}

impl Iterator for Matches<'_> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        let target = self.target;
        self.signatures
            .find(|signature| signature.matches(target))
            .map(Signature::entity)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.signatures.len()))
    }
}

impl FusedIterator for Matches<'_> {}

/// Owning iterator over the entities matching a [`Query`].
#[derive(Debug, Clone)]
pub struct IntoIter<'w> {
    signatures: std::slice::Iter<'w, Signature>,
    target: Mask,
}

impl Iterator for IntoIter<'_> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        let target = &self.target;
        self.signatures
            .find(|signature| signature.matches(target))
            .map(Signature::entity)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.signatures.len()))
    }
}

impl FusedIterator for IntoIter<'_> {}

impl<'q> IntoIterator for &'q Query<'_> {
    type Item = Entity;
    type IntoIter = Matches<'q>;

    #[inline]
    fn into_iter(self) -> Matches<'q> {
        self.iter()
    }
}

impl<'w> IntoIterator for Query<'w> {
    type Item = Entity;
    type IntoIter = IntoIter<'w>;

    #[inline]
    fn into_iter(self) -> IntoIter<'w> {
        IntoIter {
            signatures: self.signatures.iter(),
            target: self.target,
        }
    }
}

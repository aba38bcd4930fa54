use std::ops::{BitAnd, BitOr};

use fixedbitset::FixedBitSet;

use crate::ecs::component;

/// A fixed-width set of component ids.
///
/// Bit N set means component id N is included. The width is fixed when the mask is created (the
/// number of component types registered in the world) and rounded up by [`FixedBitSet`] to whole
/// machine words. With the usual handful of component types every mask is a single word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    bits: FixedBitSet,
}

impl Mask {
    /// Construct an empty mask able to hold `width` component ids.
    #[inline]
    pub fn with_width(width: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width),
        }
    }

    /// The number of component ids this mask can hold.
    #[inline]
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Include a component id.
    ///
    /// # Panics
    /// - If the id is outside the width of the mask.
    #[inline]
    pub fn insert(&mut self, id: component::Id) {
        self.bits.insert(id.index());
    }

    /// Exclude a component id.
    #[inline]
    pub fn remove(&mut self, id: component::Id) {
        if id.index() < self.bits.len() {
            self.bits.set(id.index(), false);
        }
    }

    /// Determine if a component id is included.
    #[inline]
    pub fn contains(&self, id: component::Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Determine if every id in `other` is included in this mask, i.e. `(self & other) == other`.
    #[inline]
    pub fn contains_all(&self, other: &Mask) -> bool {
        self.bits.is_superset(&other.bits)
    }

    /// Add every id of `other` to this mask.
    #[inline]
    pub fn union_with(&mut self, other: &Mask) {
        self.bits.union_with(&other.bits);
    }

    /// Determine if no id is included.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.bits.is_clear()
    }

    /// Exclude every id.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// The number of included ids.
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate the included ids in ascending order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = component::Id> + '_ {
        self.bits.ones().map(component::Id::from)
    }
}

impl BitAnd for &Mask {
    type Output = Mask;

    fn bitand(self, rhs: Self) -> Mask {
        Mask {
            bits: &self.bits & &rhs.bits,
        }
    }
}

impl BitOr for &Mask {
    type Output = Mask;

    fn bitor(self, rhs: Self) -> Mask {
        Mask {
            bits: &self.bits | &rhs.bits,
        }
    }
}

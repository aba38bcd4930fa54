use crate::{
    all_tuples,
    ecs::{
        component::{Component, Registry},
        error::{self, Error},
        signature::Mask,
    },
};

/// A compile-time list of component types: a single component, the empty tuple, or a tuple of
/// other sets.
///
/// Sets serve two purposes. When building a world they declare its fixed component type list,
/// and when querying they describe the required components as a [`Mask`].
///
/// ```ignore
/// let world = World::builder().register::<(Position, Velocity, Health)>().build();
/// let movers = world.query::<(Position, Velocity)>();
/// ```
pub trait Set: 'static {
    /// Register every component type of this set.
    fn register(registry: &mut Registry);

    /// Build the mask of this set, failing if any component type is not registered.
    fn try_mask(registry: &Registry) -> Result<Mask, Error>;

    /// Build the mask of this set.
    ///
    /// # Panics
    /// - If any component type is not registered.
    #[track_caller]
    fn mask(registry: &Registry) -> Mask {
        match Self::try_mask(registry) {
            Ok(mask) => mask,
            Err(err) => error::fail(err),
        }
    }
}

/// [`Set`] implementation for single component types.
impl<C: Component> Set for C {
    fn register(registry: &mut Registry) {
        registry.register::<C>();
    }

    fn try_mask(registry: &Registry) -> Result<Mask, Error> {
        let mut mask = registry.empty_mask();
        mask.insert(registry.try_id::<C>()?);
        Ok(mask)
    }
}

/// [`Set`] implementation for the empty tuple. Its mask is empty, so it matches every entity.
impl Set for () {
    fn register(_registry: &mut Registry) {}

    fn try_mask(registry: &Registry) -> Result<Mask, Error> {
        Ok(registry.empty_mask())
    }
}

/// [`Set`] implementation for tuples of other [`Set`] types.
macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            fn register(registry: &mut Registry) {
                $(<$name>::register(registry);)*
            }

            fn try_mask(registry: &Registry) -> Result<Mask, Error> {
                let mut mask = registry.empty_mask();
                $(
                    mask.union_with(&<$name>::try_mask(registry)?);
                )*
                Ok(mask)
            }
        }
    }
}

// Implement Set for all tuples up to 16 elements.
all_tuples!(tuple_set);

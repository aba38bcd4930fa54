/// The default maximum number of simultaneously stored entities.
pub const DEFAULT_MAX_ENTITIES: usize = 10_000;

/// Fixed sizing of a world, chosen once at construction.
///
/// Every table and the signature array are allocated to `max_entities` up front; nothing grows
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The maximum number of entities that can be alive or waiting for a flush at once. This also
    /// bounds the number of distinct entity ids ever minted.
    pub max_entities: usize,
}

impl Config {
    /// Construct a config for `max_entities` entities.
    #[inline]
    pub const fn new(max_entities: usize) -> Self {
        Self { max_entities }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(Config::default().max_entities, 10_000);
        assert_eq!(Config::new(8), Config { max_entities: 8 });
    }
}

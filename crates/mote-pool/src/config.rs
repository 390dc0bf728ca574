//! Property pool configuration parameters.

/// Configuration for a [`PropertyPool`](crate::PropertyPool).
///
/// Controls the slot stride, an optional capacity limit and the initial
/// reservation. All values are immutable after the pool is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of scalars in every slot. May be zero.
    pub properties_per_slot: usize,

    /// Maximum number of simultaneously live slots.
    ///
    /// `None` lets the pool grow until its `u32` index space is exhausted.
    /// Fixed-capacity pools return
    /// [`PoolError::OutOfResources`](crate::PoolError::OutOfResources)
    /// once the limit is reached.
    pub max_slots: Option<u32>,

    /// Number of slots reserved at construction.
    ///
    /// Default: 0. Clamped to `max_slots` when both are set.
    pub initial_slots: u32,
}

impl PoolConfig {
    /// Largest slot index a pool will issue. `u32::MAX` is the invalid index.
    pub const MAX_INDEX: u32 = u32::MAX - 1;

    /// Create a growable pool config with the given stride.
    pub fn new(properties_per_slot: usize) -> Self {
        Self {
            properties_per_slot,
            max_slots: None,
            initial_slots: 0,
        }
    }

    /// Limit the pool to `max_slots` live slots.
    pub fn with_max_slots(mut self, max_slots: u32) -> Self {
        self.max_slots = Some(max_slots);
        self
    }

    /// Reserve `initial_slots` slots at construction.
    pub fn with_initial_slots(mut self, initial_slots: u32) -> Self {
        self.initial_slots = initial_slots;
        self
    }

    /// Effective slot limit, counting the reserved invalid index.
    pub fn slot_limit(&self) -> usize {
        let index_space = Self::MAX_INDEX as usize + 1;
        match self.max_slots {
            Some(max) => (max as usize).min(index_space),
            None => index_space,
        }
    }

    /// Number of slots to reserve at construction.
    pub fn initial_reservation(&self) -> usize {
        (self.initial_slots as usize).min(self.slot_limit())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_is_growable() {
        let config = PoolConfig::new(3);
        assert_eq!(config.properties_per_slot, 3);
        assert_eq!(config.max_slots, None);
        assert_eq!(config.slot_limit(), u32::MAX as usize);
    }

    #[test]
    fn initial_reservation_clamped_to_limit() {
        let config = PoolConfig::new(2).with_max_slots(4).with_initial_slots(100);
        assert_eq!(config.slot_limit(), 4);
        assert_eq!(config.initial_reservation(), 4);
    }
}

//! Multicast delegate configuration

/// Configuration for a [`MultiCast`](super::MultiCast) handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiCastConfig {
    /// Initial number of distinct free functions to reserve room for
    pub global_capacity: usize,

    /// Initial number of distinct receivers to reserve room for
    pub receiver_capacity: usize,

    /// Emit a warning when `invoke` skips a dropped or busy receiver
    pub warn_on_stale: bool,
}

impl Default for MultiCastConfig {
    fn default() -> Self {
        Self {
            global_capacity: 0,
            receiver_capacity: 0,
            warn_on_stale: true,
        }
    }
}

impl MultiCastConfig {
    /// Set the initial free function capacity
    pub fn global_capacity(mut self, capacity: usize) -> Self {
        self.global_capacity = capacity;
        self
    }

    /// Set the initial receiver capacity
    pub fn receiver_capacity(mut self, capacity: usize) -> Self {
        self.receiver_capacity = capacity;
        self
    }

    /// Enable or disable warnings for skipped receivers
    pub fn warn_on_stale(mut self, enabled: bool) -> Self {
        self.warn_on_stale = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MultiCastConfig::default();

        assert_eq!(config.global_capacity, 0);
        assert_eq!(config.receiver_capacity, 0);
        assert!(config.warn_on_stale);
    }

    #[test]
    fn test_builder_chaining() {
        let config = MultiCastConfig::default()
            .global_capacity(16)
            .receiver_capacity(4)
            .warn_on_stale(false);

        assert_eq!(config.global_capacity, 16);
        assert_eq!(config.receiver_capacity, 4);
        assert!(!config.warn_on_stale);
    }
}

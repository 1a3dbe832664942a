//! Process wide settings read from environment variables.
//!
//! `NDSPAN_DEBUG` is a bitmask, bit 0 traces allocations, bit 1 traces
//! array construction and destruction.
//! `NDSPAN_ALIGN` overrides the default alignment of
//! [`AlignedAllocator`](crate::AlignedAllocator).

use std::sync::OnceLock;

/// Alignment used by [`AlignedAllocator`](crate::AlignedAllocator) unless configured otherwise.
pub const CACHE_LINE_SIZE: usize = 64;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Settings loaded once per process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    debug: u32,
    alignment: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: 0,
            alignment: CACHE_LINE_SIZE,
        }
    }
}

impl Config {
    /// Get process config, reading environment on first call
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }

    /// Build config from `NDSPAN_DEBUG` and `NDSPAN_ALIGN`,
    /// falling back to defaults for missing or invalid values.
    pub fn from_env() -> Config {
        let mut config = Config::default();
        if let Ok(x) = std::env::var("NDSPAN_DEBUG") {
            if let Ok(x) = x.parse::<u32>() {
                config.debug = x;
            }
        }
        if let Ok(x) = std::env::var("NDSPAN_ALIGN") {
            match x.parse::<usize>() {
                Ok(align) if align.is_power_of_two() => config.alignment = align,
                _ => {
                    if config.debug_alloc() {
                        println!("Ignoring NDSPAN_ALIGN={x}, alignment must be a power of two, using {CACHE_LINE_SIZE}");
                    }
                }
            }
        }
        config
    }

    /// Debug bitmask
    pub const fn debug(&self) -> u32 {
        self.debug
    }

    /// Default alignment for aligned allocators
    pub const fn alignment(&self) -> usize {
        self.alignment
    }

    /// Trace allocations and deallocations
    pub const fn debug_alloc(&self) -> bool {
        self.debug % 2 == 1
    }

    /// Trace array construction and destruction
    pub const fn debug_array(&self) -> bool {
        (self.debug >> 1) % 2 == 1
    }
}

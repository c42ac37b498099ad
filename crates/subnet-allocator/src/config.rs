//! Allocator configuration
//!
//! Environment variables:
//! - `SUBNET_ALLOCATOR_PARENT` - parent block, e.g. `10.0.0.0/16`
//! - `SUBNET_ALLOCATOR_INITIAL_COUNTER` - saved counter from a previous run
//! - `SUBNET_ALLOCATOR_INCREMENT` - extra addresses to skip on top of the counter

use crate::allocator::BumpAllocator;
use crate::cidr;
use crate::defaults::DEFAULT_INITIAL_COUNTER;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const ENV_PARENT: &str = "SUBNET_ALLOCATOR_PARENT";
pub const ENV_INITIAL_COUNTER: &str = "SUBNET_ALLOCATOR_INITIAL_COUNTER";
pub const ENV_INCREMENT: &str = "SUBNET_ALLOCATOR_INCREMENT";

/// Configuration for building a [`BumpAllocator`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Parent block to partition
    pub parent: String,
    /// Starting counter (None = [`DEFAULT_INITIAL_COUNTER`])
    pub initial_counter: Option<u64>,
    /// Additional addresses reserved before the first allocation
    pub increment: u64,
}

impl AllocatorConfig {
    /// Create config for a parent block with default counter
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Default::default()
        }
    }

    /// Create config from environment variables
    ///
    /// Unset counters fall back to defaults. A counter that is set but is not a
    /// non-negative integer is a `Config` error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            parent: lookup(ENV_PARENT).unwrap_or_default(),
            initial_counter: parse_counter(ENV_INITIAL_COUNTER, lookup(ENV_INITIAL_COUNTER))?,
            increment: parse_counter(ENV_INCREMENT, lookup(ENV_INCREMENT))?.unwrap_or(0),
        })
    }

    /// Counter the built allocator will start from
    pub fn effective_counter(&self) -> u64 {
        self.initial_counter
            .unwrap_or(DEFAULT_INITIAL_COUNTER)
            .saturating_add(self.increment)
    }

    /// Build an allocator from this configuration
    pub fn build(&self) -> Result<BumpAllocator> {
        if self.parent.trim().is_empty() {
            return Err(Error::Config(format!(
                "parent block is not set (expected {})",
                ENV_PARENT
            )));
        }

        let parent = cidr::parse(self.parent.trim())?;
        Ok(BumpAllocator::resume(
            parent,
            self.initial_counter.unwrap_or(DEFAULT_INITIAL_COUNTER),
            self.increment,
        ))
    }
}

/// Parse an optional counter variable, rejecting values that are set but malformed
fn parse_counter(key: &str, raw: Option<String>) -> Result<Option<u64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| Error::Config(format!("{} is not a valid counter: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::CidrAllocator;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AllocatorConfig::new("10.0.0.0/16");
        assert_eq!(config.effective_counter(), DEFAULT_INITIAL_COUNTER);

        let allocator = config.build().unwrap();
        assert_eq!(allocator.counter(), DEFAULT_INITIAL_COUNTER);
    }

    #[test]
    fn test_from_lookup() {
        let config = AllocatorConfig::from_lookup(lookup_from(&[
            (ENV_PARENT, "10.1.0.0/16"),
            (ENV_INITIAL_COUNTER, "4096"),
            (ENV_INCREMENT, " 256 "),
        ]))
        .unwrap();

        assert_eq!(config.parent, "10.1.0.0/16");
        assert_eq!(config.initial_counter, Some(4096));
        assert_eq!(config.increment, 256);

        let mut allocator = config.build().unwrap();
        assert_eq!(allocator.counter(), 4352);
        assert_eq!(allocator.allocate(24).unwrap(), "10.1.17.0/24");
    }

    #[test]
    fn test_unset_counters_use_defaults() {
        let config =
            AllocatorConfig::from_lookup(lookup_from(&[(ENV_PARENT, "10.1.0.0/16")])).unwrap();

        assert_eq!(config.initial_counter, None);
        assert_eq!(config.increment, 0);
        assert_eq!(config.effective_counter(), DEFAULT_INITIAL_COUNTER);
    }

    #[test]
    fn test_malformed_initial_counter_is_rejected() {
        for raw in ["512x", "lots", "-5", ""] {
            let result = AllocatorConfig::from_lookup(lookup_from(&[
                (ENV_PARENT, "10.1.0.0/16"),
                (ENV_INITIAL_COUNTER, raw),
            ]));
            assert!(
                matches!(result, Err(Error::Config(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_malformed_increment_is_rejected() {
        let result = AllocatorConfig::from_lookup(lookup_from(&[
            (ENV_PARENT, "10.1.0.0/16"),
            (ENV_INITIAL_COUNTER, "512"),
            (ENV_INCREMENT, "256 addresses"),
        ]));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resumed_run_does_not_reuse_blocks() {
        let mut first = AllocatorConfig::new("10.0.0.0/16").build().unwrap();
        let first_block = first.allocate_block(24).unwrap();
        let saved = first.counter().to_string();

        let mut second = AllocatorConfig::from_lookup(lookup_from(&[
            (ENV_PARENT, "10.0.0.0/16"),
            (ENV_INITIAL_COUNTER, saved.as_str()),
        ]))
        .unwrap()
        .build()
        .unwrap();
        let second_block = second.allocate_block(24).unwrap();

        assert!(!first_block.overlaps(&second_block));

        let malformed = format!("{}x", saved);
        let result = AllocatorConfig::from_lookup(lookup_from(&[
            (ENV_PARENT, "10.0.0.0/16"),
            (ENV_INITIAL_COUNTER, malformed.as_str()),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_parent() {
        let config = AllocatorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(matches!(config.build(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_parent() {
        let config = AllocatorConfig::new("10.1.0/16");
        assert!(matches!(config.build(), Err(Error::InvalidCidr(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: AllocatorConfig =
            serde_json::from_str(r#"{"parent":"10.2.0.0/16","increment":1024}"#).unwrap();

        assert_eq!(config.initial_counter, None);
        assert_eq!(config.effective_counter(), 1280);
    }
}

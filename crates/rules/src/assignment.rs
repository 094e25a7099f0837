//! Agent suggestion at intake
//!
//! A suggestion is only a default for the owner field; staff can reassign.
//! Which pool applies is decided by ordered rules on brand and category. The
//! pick within a pool is delegated to a [`Picker`] so tests can pin it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use leaddesk_config::{AssignmentPools, CrmConfig, PickerKind};

/// Chooses an index within a pool
pub trait Picker: Send + Sync {
    /// Index in `0..len`; `len` is never zero
    fn pick(&self, pool: &'static str, len: usize) -> usize;
}

/// Rotates through each pool independently
#[derive(Debug, Default)]
pub struct RoundRobinPicker {
    counters: Mutex<HashMap<&'static str, usize>>,
}

impl RoundRobinPicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Picker for RoundRobinPicker {
    fn pick(&self, pool: &'static str, len: usize) -> usize {
        let mut counters = self.counters.lock();
        let next = counters.entry(pool).or_insert(0);
        let index = *next % len;
        *next = next.wrapping_add(1);
        index
    }
}

/// Uniform random pick
#[derive(Debug)]
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for RandomPicker {
    fn pick(&self, _pool: &'static str, len: usize) -> usize {
        self.rng.lock().gen_range(0..len)
    }
}

/// Wall-clock milliseconds modulo pool size
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockPicker;

impl Picker for ClockPicker {
    fn pick(&self, _pool: &'static str, len: usize) -> usize {
        let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
        (millis % len as u64) as usize
    }
}

/// Build the picker named in configuration
pub fn picker_for(kind: PickerKind) -> Arc<dyn Picker> {
    match kind {
        PickerKind::RoundRobin => Arc::new(RoundRobinPicker::new()),
        PickerKind::Random => Arc::new(RandomPicker::new()),
        PickerKind::Clock => Arc::new(ClockPicker),
    }
}

/// Suggests an owner for a new lead
#[derive(Clone)]
pub struct AgentSuggester {
    pools: AssignmentPools,
    picker: Arc<dyn Picker>,
}

impl AgentSuggester {
    pub fn new(pools: AssignmentPools, picker: Arc<dyn Picker>) -> Self {
        Self { pools, picker }
    }

    pub fn from_config(config: &CrmConfig) -> Self {
        Self::new(config.pools.clone(), picker_for(config.picker))
    }

    /// Suggested owner, or `None` when the matching pool is empty
    pub fn suggest(&self, brand: &str, category: &str) -> Option<String> {
        let brand = brand.trim().to_lowercase();
        let category = category.to_lowercase();

        match brand.as_str() {
            "microsoft" => return self.pick("microsoft", &self.pools.microsoft),
            "seqrite" => return self.pick("seqrite", &self.pools.seqrite),
            "cisco" => return self.pick("network", &self.pools.network),
            _ => {}
        }

        if category.contains("network") {
            self.pick("network", &self.pools.network)
        } else if category.contains("support") {
            self.pools.support.clone()
        } else {
            self.pick("general", &self.pools.general)
        }
    }

    fn pick(&self, pool: &'static str, names: &[String]) -> Option<String> {
        if names.is_empty() {
            return None;
        }
        let index = self.picker.pick(pool, names.len()).min(names.len() - 1);
        names.get(index).cloned()
    }
}

impl std::fmt::Debug for AgentSuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSuggester")
            .field("pools", &self.pools)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggester() -> AgentSuggester {
        AgentSuggester::new(AssignmentPools::default(), Arc::new(RoundRobinPicker::new()))
    }

    /// Always the first entry
    struct FirstPicker;

    impl Picker for FirstPicker {
        fn pick(&self, _pool: &'static str, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_brand_pools() {
        let s = AgentSuggester::new(AssignmentPools::default(), Arc::new(FirstPicker));
        assert_eq!(s.suggest("Microsoft", ""), Some("Nidhi".to_string()));
        assert_eq!(s.suggest(" SEQRITE ", ""), Some("Aman".to_string()));
        assert_eq!(s.suggest("cisco", ""), Some("Karan".to_string()));
        assert_eq!(s.suggest("Other", "Network switches"), Some("Karan".to_string()));
        assert_eq!(s.suggest("Other", ""), Some("Rimpy".to_string()));
    }

    #[test]
    fn test_brand_beats_category() {
        let s = AgentSuggester::new(AssignmentPools::default(), Arc::new(FirstPicker));
        assert_eq!(s.suggest("microsoft", "support"), Some("Nidhi".to_string()));
    }

    #[test]
    fn test_support_is_fixed() {
        let s = suggester();
        for _ in 0..5 {
            assert_eq!(s.suggest("", "AMC support"), Some("Deepak".to_string()));
        }
    }

    #[test]
    fn test_round_robin_rotates_per_pool() {
        let s = suggester();
        assert_eq!(s.suggest("microsoft", ""), Some("Nidhi".to_string()));
        assert_eq!(s.suggest("seqrite", ""), Some("Aman".to_string()));
        assert_eq!(s.suggest("microsoft", ""), Some("Simran".to_string()));
        assert_eq!(s.suggest("microsoft", ""), Some("Nidhi".to_string()));

        let general: Vec<_> = (0..3).filter_map(|_| s.suggest("", "")).collect();
        assert_eq!(general, vec!["Rimpy", "Gurpreet", "Manpreet"]);
    }

    #[test]
    fn test_empty_pool_yields_none() {
        let pools = AssignmentPools {
            microsoft: Vec::new(),
            support: None,
            ..Default::default()
        };
        let s = AgentSuggester::new(pools, Arc::new(RoundRobinPicker::new()));
        assert_eq!(s.suggest("microsoft", ""), None);
        assert_eq!(s.suggest("", "support"), None);
    }

    #[test]
    fn test_random_picker_stays_in_pool() {
        let s = AgentSuggester::new(AssignmentPools::default(), Arc::new(RandomPicker::seeded(7)));
        let pool = AssignmentPools::default().general;
        for _ in 0..50 {
            let name = s.suggest("", "").unwrap();
            assert!(pool.contains(&name));
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = RandomPicker::seeded(42);
        let b = RandomPicker::seeded(42);
        let left: Vec<_> = (0..20).map(|_| a.pick("general", 3)).collect();
        let right: Vec<_> = (0..20).map(|_| b.pick("general", 3)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_clock_picker_in_range() {
        for len in 1..5 {
            assert!(ClockPicker.pick("general", len) < len);
        }
    }

    #[test]
    fn test_from_config_uses_configured_pools() {
        let mut config = CrmConfig::default();
        config.pools.support = Some("Pooja".to_string());
        let s = AgentSuggester::from_config(&config);
        assert_eq!(s.suggest("", "support"), Some("Pooja".to_string()));
    }
}

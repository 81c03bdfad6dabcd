use std::{collections::{HashMap, HashSet}, sync::{Mutex, PoisonError}};

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{config::{PlannerConfig, SuffixKind}, planner::{AggregationSet, VariableRef}, types::DataType};

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").expect("valid sanitizer regex"));

/// Source of fresh plan variables.
///
/// Every returned name must be unique against everything the allocator has
/// handed out or been told about, including across threads.
pub trait VariableAllocator: Send + Sync {
    fn new_variable(&self, hint: &str, ty: DataType) -> VariableRef;
}

#[derive(Debug, Default)]
struct AllocatorState {
    used: HashSet<String>,
    // next numeric suffix to try per sanitized hint
    next_suffix: HashMap<String, u64>,
}

/// Thread-safe allocator for one plan.
#[derive(Debug)]
pub struct PlanVariableAllocator {
    suffix: SuffixKind,
    separator: String,
    state: Mutex<AllocatorState>,
}

impl Default for PlanVariableAllocator {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl PlanVariableAllocator {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            suffix: config.variable_suffix,
            separator: config.suffix_separator.clone(),
            state: Mutex::new(AllocatorState::default()),
        }
    }

    /// Mark `names` as taken so they are never handed out.
    pub fn reserve<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.used.extend(names.into_iter().map(Into::into));
    }

    /// Reserve every variable `set` mentions: outputs, grouping keys and the
    /// variables read by its calls.
    pub fn reserving(self, set: &AggregationSet) -> Self {
        self.reserve(set.variables().into_iter().map(|v| v.name().to_string()));
        self
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).used.contains(name)
    }

    fn sanitize(hint: &str) -> String {
        let lower = hint.trim().to_ascii_lowercase();
        let clean = NON_IDENT.replace_all(&lower, "_");
        if clean.is_empty() { "expr".to_string() } else { clean.into_owned() }
    }

    fn next_name(&self, state: &mut AllocatorState, base: &str) -> String {
        match self.suffix {
            SuffixKind::Uuid => loop {
                let candidate = format!("{base}{}{}", self.separator, Uuid::new_v4().simple());
                if !state.used.contains(&candidate) {
                    return candidate;
                }
            },
            SuffixKind::Sequential => {
                if !state.used.contains(base) {
                    return base.to_string();
                }
                let counter = state.next_suffix.entry(base.to_string()).or_insert(1);
                loop {
                    let candidate = format!("{base}{}{}", self.separator, *counter);
                    *counter += 1;
                    if !state.used.contains(&candidate) {
                        return candidate;
                    }
                }
            }
        }
    }
}

impl VariableAllocator for PlanVariableAllocator {
    fn new_variable(&self, hint: &str, ty: DataType) -> VariableRef {
        let base = Self::sanitize(hint);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let name = self.next_name(&mut state, &base);
        state.used.insert(name.clone());
        VariableRef::new(name, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn sequential_names_start_bare_then_count_up() {
        let alloc = PlanVariableAllocator::new(&PlannerConfig::sequential());
        let names: Vec<_> = (0..3)
            .map(|_| alloc.new_variable("sum", DataType::Bigint).name().to_string())
            .collect();
        assert_eq!(names, vec!["sum", "sum_1", "sum_2"]);
    }

    #[test]
    fn reserved_names_are_skipped() {
        let alloc = PlanVariableAllocator::default();
        alloc.reserve(["count", "count_1"]);
        assert_eq!(alloc.new_variable("count", DataType::Bigint).name(), "count_2");
        assert!(alloc.is_used("count_2"));
    }

    #[test]
    fn hints_are_sanitized() {
        let alloc = PlanVariableAllocator::default();
        assert_eq!(alloc.new_variable("Approx Distinct!", DataType::HyperLogLog).name(), "approx_distinct_");
        assert_eq!(alloc.new_variable("   ", DataType::Bigint).name(), "expr");
    }

    #[test]
    fn uuid_suffixes_use_separator_and_type() {
        let mut cfg = PlannerConfig::uuid();
        cfg.suffix_separator = "$".into();
        let alloc = PlanVariableAllocator::new(&cfg);
        let v = alloc.new_variable("avg", DataType::Double);
        assert!(v.name().starts_with("avg$"));
        assert_eq!(v.name().len(), "avg$".len() + 32);
        assert_eq!(v.ty(), &DataType::Double);
        assert_ne!(alloc.new_variable("avg", DataType::Double).name(), v.name());
    }

    #[test]
    fn concurrent_allocation_never_repeats() {
        let alloc = Arc::new(PlanVariableAllocator::default());
        let mut all: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let alloc = Arc::clone(&alloc);
                    s.spawn(move || {
                        (0..200)
                            .map(|_| alloc.new_variable("sum", DataType::Bigint).name().to_string())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(total, 1600);
    }
}

//! Heap configuration
//!
//! The only tunable today is which link/cut counters a heap reports. Both
//! counter sets are always maintained; see [`crate::stats`].

/// Which lifetime counters [`total_links`](crate::FibonacciHeap::total_links)
/// and [`total_cuts`](crate::FibonacciHeap::total_cuts) report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CounterScope {
    /// Counters belong to the heap. Melding adds the absorbed heap's counters.
    #[default]
    PerHeap,
    /// Counters are shared by every heap in the process.
    Process,
}

/// Construction-time options for a [`FibonacciHeap`](crate::FibonacciHeap).
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::{CounterScope, FibonacciHeap, HeapConfig};
///
/// let config = HeapConfig::new().with_counter_scope(CounterScope::Process);
/// let heap = FibonacciHeap::with_config(config);
/// assert_eq!(heap.config().counter_scope, CounterScope::Process);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HeapConfig {
    /// Scope of the reported link/cut counters
    pub counter_scope: CounterScope,
}

impl HeapConfig {
    /// The default configuration: per-heap counters.
    pub const fn new() -> Self {
        HeapConfig {
            counter_scope: CounterScope::PerHeap,
        }
    }

    /// Returns a copy with the given counter scope.
    pub const fn with_counter_scope(mut self, counter_scope: CounterScope) -> Self {
        self.counter_scope = counter_scope;
        self
    }
}

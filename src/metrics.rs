// Resolution metrics
//
// Counters for how add-ons were resolved and what the external services cost.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::models::Provenance;

/// Per-run resolution counters.
///
/// Atomic so a shared `Arc<ResolutionMetrics>` can be handed to every component without
/// locking; the pipeline itself is single-task.
#[derive(Debug)]
pub struct ResolutionMetrics {
    pub static_hits: AtomicU64,
    pub manual_hits: AtomicU64,
    pub alias_hits: AtomicU64,
    pub fuzzy_hits: AtomicU64,
    pub registry_hits: AtomicU64,
    pub generative_hits: AtomicU64,
    pub unresolved: AtomicU64,

    /// Records served from the persisted cache instead of a network tier.
    pub cache_hits: AtomicU64,

    /// Registry HTTP calls issued (batch, fetch and search).
    pub registry_calls: AtomicU64,

    /// Generate calls issued to the generative service.
    pub generative_calls: AtomicU64,

    /// Calls that failed on transport, timeout or status.
    pub network_failures: AtomicU64,

    /// Generative answers rejected by validation.
    pub schema_failures: AtomicU64,

    start_time: Instant,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self {
            static_hits: AtomicU64::new(0),
            manual_hits: AtomicU64::new(0),
            alias_hits: AtomicU64::new(0),
            fuzzy_hits: AtomicU64::new(0),
            registry_hits: AtomicU64::new(0),
            generative_hits: AtomicU64::new(0),
            unresolved: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            registry_calls: AtomicU64::new(0),
            generative_calls: AtomicU64::new(0),
            network_failures: AtomicU64::new(0),
            schema_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Count one final record under the tier that produced it.
    pub fn record_resolution(&self, provenance: Provenance) {
        let counter = match provenance {
            Provenance::Static => &self.static_hits,
            Provenance::Manual => &self.manual_hits,
            Provenance::Alias => &self.alias_hits,
            Provenance::Fuzzy => &self.fuzzy_hits,
            Provenance::Registry => &self.registry_hits,
            Provenance::Generative => &self.generative_hits,
            Provenance::Unknown => &self.unresolved,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registry_call(&self) {
        self.registry_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generative_call(&self) {
        self.generative_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_failure(&self) {
        self.network_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_schema_failure(&self) {
        self.schema_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn resolved_total(&self) -> u64 {
        [
            &self.static_hits,
            &self.manual_hits,
            &self.alias_hits,
            &self.fuzzy_hits,
            &self.registry_hits,
            &self.generative_hits,
        ]
        .iter()
        .map(|c| c.load(Ordering::Relaxed))
        .sum()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Resolution Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Resolved: {} (static {}, manual {}, alias {}, fuzzy {}, registry {}, generative {}), unresolved {}",
            self.resolved_total(),
            self.static_hits.load(Ordering::Relaxed),
            self.manual_hits.load(Ordering::Relaxed),
            self.alias_hits.load(Ordering::Relaxed),
            self.fuzzy_hits.load(Ordering::Relaxed),
            self.registry_hits.load(Ordering::Relaxed),
            self.generative_hits.load(Ordering::Relaxed),
            self.unresolved.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Cache hits: {}, registry calls: {}, generative calls: {}",
            self.cache_hits.load(Ordering::Relaxed),
            self.registry_calls.load(Ordering::Relaxed),
            self.generative_calls.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Failures: {} network, {} rejected answers",
            self.network_failures.load(Ordering::Relaxed),
            self.schema_failures.load(Ordering::Relaxed)
        );
    }
}

impl Default for ResolutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

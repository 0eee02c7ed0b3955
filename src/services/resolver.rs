//! The identity resolution pipeline.
//!
//! Each add-on walks an ordered chain of tiers and stops at the first that produces a record:
//!
//! 1. static table (exact, case-insensitive)
//! 2. manual entries from `knowledge.yaml`
//! 3. a cached alias or registry record
//! 4. alias table, fetched from the registry by slug
//! 5. fuzzy match against the static table
//! 6. a cached generative record
//! 7. registry: batch prefetch by known id, else search and fetch the best hit
//! 8. generative fallback, if the service is up and the model is loaded
//! 9. the "unknown" placeholder
//!
//! Network failures in any tier are logged and fall through. Alias, registry and generative
//! results are written through to the cache so a later run doesn't pay for them again.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::knowledge::KnowledgeBase;
use crate::metrics::ResolutionMetrics;
use crate::models::{AddonCandidate, AddonRecord, DatapackRecord, KnowledgeEntry, Provenance};
use crate::services::cache::ResolutionCache;
use crate::services::generative::{
    GenerativeApi, GenerativeError, addon_prompt, datapack_prompt, validate_addon_response,
    validate_datapack_response,
};
use crate::services::registry::{Project, RegistryApi, select_best_hit};

/// Resolves add-on identities against the knowledge base, cache, registry and generative
/// service. Either service may be absent, in which case its tiers are skipped.
pub struct IdentityResolver<R, G> {
    knowledge: KnowledgeBase,
    cache: ResolutionCache,
    registry: Option<R>,
    generative: Option<G>,
    /// Availability is probed once per run, on first need.
    generative_available: Option<bool>,
    batch_limit: usize,
    guide_prompts: bool,
    metrics: Arc<ResolutionMetrics>,
}

fn record_from_entry(candidate: &AddonCandidate, entry: &KnowledgeEntry, provenance: Provenance) -> AddonRecord {
    AddonRecord {
        side: entry.side,
        requirement: entry.requirement,
        description: entry.description.clone(),
        provenance,
        ..AddonRecord::placeholder(candidate)
    }
    .bind_to(candidate)
}

impl<R: RegistryApi, G: GenerativeApi> IdentityResolver<R, G> {
    pub fn new(knowledge: KnowledgeBase, cache: ResolutionCache) -> Self {
        Self {
            knowledge,
            cache,
            registry: None,
            generative: None,
            generative_available: None,
            batch_limit: 100,
            guide_prompts: true,
            metrics: Arc::new(ResolutionMetrics::new()),
        }
    }

    pub fn with_registry(mut self, registry: R, batch_limit: usize) -> Self {
        self.registry = Some(registry);
        self.batch_limit = batch_limit.max(1);
        self
    }

    pub fn with_generative(mut self, generative: G, guide_prompts: bool) -> Self {
        self.generative = Some(generative);
        self.guide_prompts = guide_prompts;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ResolutionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    pub fn metrics(&self) -> &Arc<ResolutionMetrics> {
        &self.metrics
    }

    /// Resolve every candidate, in order, one record per distinct key.
    ///
    /// Candidates repeating an earlier key are dropped. Known registry ids of the candidates
    /// the local tiers couldn't place are fetched in batches before the registry tier runs.
    pub async fn resolve_all(&mut self, candidates: &[AddonCandidate]) -> Vec<AddonRecord> {
        let mut seen = HashSet::new();
        let unique: Vec<&AddonCandidate> = candidates.iter().filter(|c| seen.insert(c.key())).collect();

        let mut early = Vec::with_capacity(unique.len());
        for candidate in &unique {
            early.push(self.resolve_before_registry(candidate).await);
        }

        let pending_ids: Vec<String> = unique
            .iter()
            .zip(&early)
            .filter(|(_, record)| record.is_none())
            .filter_map(|(candidate, _)| candidate.registry_id.clone())
            .collect();
        let prefetched = self.prefetch(&pending_ids).await;

        let mut records = Vec::with_capacity(unique.len());
        for (candidate, record) in unique.into_iter().zip(early) {
            let record = match record {
                Some(record) => record,
                None => self.resolve_remote(candidate, &prefetched).await,
            };
            tracing::debug!("{} -> {} ({})", candidate.artifact, record.canonical_name, record.provenance.as_str());
            self.metrics.record_resolution(record.provenance);
            records.push(record);
        }
        records
    }

    /// Resolve a single candidate through the full chain.
    pub async fn resolve(&mut self, candidate: &AddonCandidate) -> AddonRecord {
        self.resolve_all(std::slice::from_ref(candidate))
            .await
            .pop()
            .unwrap_or_else(|| AddonRecord::placeholder(candidate))
    }

    /// Store the service's own answer, then constrain its side for this installation.
    /// Cached records always carry the unconstrained side.
    fn remember(&mut self, record: AddonRecord, candidate: &AddonCandidate) -> AddonRecord {
        self.cache.put(record.clone());
        record.bind_to(candidate)
    }

    fn cached(&self, candidate: &AddonCandidate, above: Option<Provenance>) -> Option<AddonRecord> {
        let cached = self.cache.get(&candidate.name)?;
        if cached.is_placeholder() {
            return None;
        }
        if let Some(floor) = above
            && cached.provenance.confidence() <= floor.confidence()
        {
            return None;
        }
        self.metrics.record_cache_hit();
        Some(cached.clone().bind_to(candidate))
    }

    /// Tiers 1-6: everything that doesn't need a search or the generative service.
    async fn resolve_before_registry(&mut self, candidate: &AddonCandidate) -> Option<AddonRecord> {
        if let Some(entry) = self.knowledge.lookup_static(&candidate.name) {
            return Some(record_from_entry(candidate, entry, Provenance::Static));
        }
        if let Some(entry) = self.knowledge.lookup_manual(&candidate.name) {
            return Some(record_from_entry(candidate, entry, Provenance::Manual));
        }
        if let Some(record) = self.cached(candidate, Some(Provenance::Fuzzy)) {
            return Some(record);
        }
        if let Some(record) = self.resolve_alias(candidate).await {
            return Some(self.remember(record, candidate));
        }
        if let Some(hit) = self.knowledge.fuzzy_match(&candidate.name, &candidate.artifact) {
            tracing::debug!("Fuzzy {:?} match '{}' for {}", hit.strategy, hit.key, candidate.name);
            return Some(record_from_entry(candidate, hit.entry, Provenance::Fuzzy));
        }
        self.cached(candidate, None)
    }

    async fn resolve_alias(&mut self, candidate: &AddonCandidate) -> Option<AddonRecord> {
        let slug = self.knowledge.alias_for(&candidate.name)?.to_string();
        let registry = self.registry.as_mut()?;

        self.metrics.record_registry_call();
        match registry.fetch_project(&slug).await {
            Ok(Some(project)) => Some(project.to_record(candidate, Provenance::Alias)),
            Ok(None) => {
                tracing::warn!("Alias '{}' for {} is unknown to the registry", slug, candidate.name);
                None
            }
            Err(e) => {
                tracing::warn!("Alias fetch for {} failed: {}", candidate.name, e);
                self.metrics.record_network_failure();
                None
            }
        }
    }

    async fn prefetch(&mut self, ids: &[String]) -> HashMap<String, Project> {
        let mut projects = HashMap::new();
        let Some(registry) = self.registry.as_mut() else {
            return projects;
        };

        for chunk in ids.chunks(self.batch_limit) {
            self.metrics.record_registry_call();
            match registry.fetch_projects(chunk).await {
                Ok(batch) => {
                    tracing::info!("Batch-fetched {} of {} projects", batch.len(), chunk.len());
                    projects.extend(batch.into_iter().map(|p| (p.id.clone(), p)));
                }
                Err(e) => {
                    tracing::warn!("Batch fetch of {} projects failed: {}", chunk.len(), e);
                    self.metrics.record_network_failure();
                }
            }
        }
        projects
    }

    /// Tiers 7-9.
    async fn resolve_remote(&mut self, candidate: &AddonCandidate, prefetched: &HashMap<String, Project>) -> AddonRecord {
        if let Some(record) = self.resolve_registry(candidate, prefetched).await {
            return self.remember(record, candidate);
        }
        if let Some(record) = self.resolve_generative(candidate).await {
            return self.remember(record, candidate);
        }
        tracing::info!("Could not resolve {} ({})", candidate.name, candidate.artifact);
        AddonRecord::placeholder(candidate)
    }

    async fn resolve_registry(
        &mut self,
        candidate: &AddonCandidate,
        prefetched: &HashMap<String, Project>,
    ) -> Option<AddonRecord> {
        if let Some(project) = candidate.registry_id.as_ref().and_then(|id| prefetched.get(id)) {
            return Some(project.to_record(candidate, Provenance::Registry));
        }

        let registry = self.registry.as_mut()?;

        self.metrics.record_registry_call();
        let hits = match registry.search(&candidate.name).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Registry search for {} failed: {}", candidate.name, e);
                self.metrics.record_network_failure();
                return None;
            }
        };
        let Some(best) = select_best_hit(&candidate.name, &hits) else {
            tracing::debug!("No acceptable registry hit for {} among {}", candidate.name, hits.len());
            return None;
        };

        self.metrics.record_registry_call();
        match registry.fetch_project(&best.project_id).await {
            Ok(Some(project)) => Some(project.to_record(candidate, Provenance::Registry)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Registry fetch of {} failed: {}", best.project_id, e);
                self.metrics.record_network_failure();
                None
            }
        }
    }

    async fn generative_ready(&mut self) -> bool {
        if let Some(available) = self.generative_available {
            return available;
        }
        let available = match self.generative.as_mut() {
            Some(generative) => generative.is_available().await,
            None => false,
        };
        if !available && self.generative.is_some() {
            tracing::warn!("Generative fallback unavailable for this run");
        }
        self.generative_available = Some(available);
        available
    }

    async fn generate(&mut self, prompt: &str) -> Option<String> {
        if !self.generative_ready().await {
            return None;
        }
        let generative = self.generative.as_mut()?;

        self.metrics.record_generative_call();
        match generative.generate(prompt).await {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("Generative call failed: {}", e);
                match e {
                    GenerativeError::Schema(_) => self.metrics.record_schema_failure(),
                    _ => self.metrics.record_network_failure(),
                }
                None
            }
        }
    }

    async fn resolve_generative(&mut self, candidate: &AddonCandidate) -> Option<AddonRecord> {
        let prompt = addon_prompt(candidate, self.guide_prompts);
        let raw = self.generate(&prompt).await?;

        match validate_addon_response(&raw, candidate.context.side_hint(), self.guide_prompts) {
            Ok(answer) => Some(
                AddonRecord {
                    side: answer.side,
                    requirement: answer.requirement,
                    description: answer.description,
                    provenance: Provenance::Generative,
                    extended_fields: answer.guide,
                    ..AddonRecord::placeholder(candidate)
                },
            ),
            Err(e) => {
                tracing::warn!("Discarding generative answer for {}: {}", candidate.name, e);
                self.metrics.record_schema_failure();
                None
            }
        }
    }

    /// Describe a datapack: cache, then the generative service, then an empty record.
    pub async fn resolve_datapack(&mut self, name: &str, folder: &str) -> DatapackRecord {
        if let Some(cached) = self.cache.get_datapack(folder) {
            self.metrics.record_cache_hit();
            return DatapackRecord {
                name: name.to_string(),
                folder: folder.to_string(),
                ..cached.clone()
            };
        }

        if let Some(raw) = self.generate(&datapack_prompt(folder)).await {
            match validate_datapack_response(&raw) {
                Ok(answer) => {
                    let record = DatapackRecord {
                        name: name.to_string(),
                        folder: folder.to_string(),
                        description: answer.description,
                        provenance: Provenance::Generative,
                        extended_fields: answer.guide,
                    };
                    self.cache.put_datapack(record.clone());
                    return record;
                }
                Err(e) => {
                    tracing::warn!("Discarding generative answer for datapack {}: {}", folder, e);
                    self.metrics.record_schema_failure();
                }
            }
        }

        DatapackRecord {
            name: name.to_string(),
            folder: folder.to_string(),
            description: String::new(),
            provenance: Provenance::Unknown,
            extended_fields: Default::default(),
        }
    }
}

//! Integration tests for IdentityResolver
//!
//! These tests verify:
//! - Tier order (static, manual, alias, fuzzy, registry, generative, placeholder)
//! - Side normalization against the installation context
//! - Cache write-through and idempotent re-runs
//! - Network failures falling through to the next tier
//! - Datapack descriptions

use modlist::models::{
    AddonCandidate, InstallContext, KnowledgeEntry, KnowledgeOverrides, Provenance, Requirement, Side,
};
use modlist::services::generative::{GenerativeApi, GenerativeError};
use modlist::services::registry::{Project, RegistryApi, RegistryError, SearchHit};
use modlist::services::{IdentityResolver, ResolutionCache};
use modlist::{KnowledgeBase, ResolutionMetrics};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio_test::block_on;

#[derive(Default)]
struct FakeRegistry {
    projects: HashMap<String, Project>,
    hits: Vec<SearchHit>,
    fail: bool,
}

fn status_error() -> RegistryError {
    RegistryError::Client("registry offline".to_string())
}

impl FakeRegistry {
    fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.id.clone(), project.clone());
        self.projects.insert(project.slug.clone(), project);
        self
    }
}

impl RegistryApi for FakeRegistry {
    async fn fetch_projects(&mut self, ids: &[String]) -> Result<Vec<Project>, RegistryError> {
        if self.fail {
            return Err(status_error());
        }
        Ok(ids.iter().filter_map(|id| self.projects.get(id).cloned()).collect())
    }

    async fn fetch_project(&mut self, id_or_slug: &str) -> Result<Option<Project>, RegistryError> {
        if self.fail {
            return Err(status_error());
        }
        Ok(self.projects.get(id_or_slug).cloned())
    }

    async fn search(&mut self, _query: &str) -> Result<Vec<SearchHit>, RegistryError> {
        if self.fail {
            return Err(status_error());
        }
        Ok(self.hits.clone())
    }
}

struct FakeGenerative {
    available: bool,
    answer: String,
}

impl FakeGenerative {
    fn answering(answer: &str) -> Self {
        Self {
            available: true,
            answer: answer.to_string(),
        }
    }
}

impl GenerativeApi for FakeGenerative {
    async fn is_available(&mut self) -> bool {
        self.available
    }

    async fn generate(&mut self, _prompt: &str) -> Result<String, GenerativeError> {
        Ok(self.answer.clone())
    }
}

type Resolver = IdentityResolver<FakeRegistry, FakeGenerative>;

fn project(id: &str, slug: &str, title: &str, client: &str, server: &str) -> Project {
    Project {
        id: id.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        description: format!("{} from the registry", title),
        client_side: client.to_string(),
        server_side: server.to_string(),
        ..Project::default()
    }
}

fn knowledge() -> KnowledgeBase {
    let mut kb = KnowledgeBase::empty();
    kb.insert_addon("Lithium", "Server-side game logic optimization", Side::Both, Requirement::Optional);
    kb.insert_addon("Xaero's Minimap", "Minimap overlay", Side::Client, Requirement::Optional);
    kb.insert_addon("Ledger", "Block change logging", Side::Server, Requirement::Optional);
    kb.insert_alias("Chunky", "chunky");
    kb
}

fn client(name: &str) -> AddonCandidate {
    AddonCandidate::new(name, format!("{}-1.0.jar", name.to_lowercase()), "1.0", InstallContext::Client)
}

fn server(name: &str) -> AddonCandidate {
    AddonCandidate::new(name, format!("{}-1.0.jar", name.to_lowercase()), "1.0", InstallContext::Server)
}

#[test]
fn test_static_hit_needs_no_network() {
    let mut resolver: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory())
        .with_registry(FakeRegistry::default(), 100);

    let record = block_on(resolver.resolve(&client("LITHIUM")));

    assert_eq!(record.provenance, Provenance::Static);
    assert_eq!(record.description, "Server-side game logic optimization");
    assert_eq!(record.canonical_name, "LITHIUM");
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_side_normalized_for_installation_context() {
    let mut resolver: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory());

    let ledger = block_on(resolver.resolve(&client("Ledger")));
    let minimap = block_on(resolver.resolve(&server("Xaero's Minimap")));

    assert_eq!(ledger.side, Side::Both);
    assert_eq!(minimap.side, Side::Both);
}

#[test]
fn test_manual_entry_after_static() {
    let mut overrides = KnowledgeOverrides::default();
    overrides.manual_addons.insert(
        "House Rules".to_string(),
        KnowledgeEntry {
            description: "Server-specific tweaks".to_string(),
            side: Side::Server,
            requirement: Requirement::Required,
        },
    );
    let mut resolver: Resolver =
        IdentityResolver::new(knowledge().with_overrides(overrides), ResolutionCache::in_memory());

    let record = block_on(resolver.resolve(&server("house rules")));
    assert_eq!(record.provenance, Provenance::Manual);
    assert_eq!(record.requirement, Requirement::Required);
}

#[test]
fn test_alias_fetches_by_slug_and_caches() {
    let registry = FakeRegistry::default().with_project(project("abc123", "chunky", "Chunky", "unsupported", "required"));
    let mut resolver: Resolver =
        IdentityResolver::new(knowledge(), ResolutionCache::in_memory()).with_registry(registry, 100);

    let record = block_on(resolver.resolve(&server("Chunky")));

    assert_eq!(record.provenance, Provenance::Alias);
    assert_eq!(record.side, Side::Server);
    assert_eq!(record.registry.as_ref().unwrap().slug, "chunky");
    assert_eq!(resolver.cache().get("chunky").unwrap().provenance, Provenance::Alias);
}

#[test]
fn test_fuzzy_match_when_no_exact_key() {
    let mut resolver: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory());

    let record = block_on(resolver.resolve(&server("Ledger Extras")));

    assert_eq!(record.provenance, Provenance::Fuzzy);
    assert_eq!(record.description, "Block change logging");
}

#[test]
fn test_known_ids_are_batch_prefetched() {
    let registry = FakeRegistry::default()
        .with_project(project("P1", "sodium", "Sodium", "required", "unsupported"))
        .with_project(project("P2", "iris", "Iris Shaders", "required", "unsupported"));
    let mut resolver: Resolver =
        IdentityResolver::new(knowledge(), ResolutionCache::in_memory()).with_registry(registry, 1);

    let candidates = vec![
        client("Sodium").with_registry_id("P1"),
        client("Iris Shaders").with_registry_id("P2"),
        client("Lithium").with_registry_id("P3"),
    ];
    let records = block_on(resolver.resolve_all(&candidates));

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].provenance, Provenance::Registry);
    assert_eq!(records[1].provenance, Provenance::Registry);
    assert_eq!(records[1].side, Side::Client);
    assert_eq!(records[2].provenance, Provenance::Static);
    assert_eq!(resolver.cache().len(), 2);
}

#[test]
fn test_alias_rerun_is_served_from_cache() {
    let registry = FakeRegistry::default().with_project(project("abc123", "chunky", "Chunky", "unsupported", "required"));
    let metrics = Arc::new(ResolutionMetrics::new());
    let mut first: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory())
        .with_registry(registry, 100)
        .with_metrics(Arc::clone(&metrics));
    let first_record = block_on(first.resolve(&server("Chunky")));
    let calls = metrics.registry_calls.load(Ordering::Relaxed);
    assert_eq!(calls, 1);

    let mut second: Resolver = IdentityResolver::new(knowledge(), first.into_cache())
        .with_registry(FakeRegistry::default(), 100)
        .with_metrics(Arc::clone(&metrics));
    let second_record = block_on(second.resolve(&server("Chunky")));

    assert_eq!(second_record, first_record);
    assert_eq!(metrics.registry_calls.load(Ordering::Relaxed), calls);
    assert_eq!(metrics.cache_hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_registry_rerun_is_served_from_cache() {
    let registry = FakeRegistry::default().with_project(project("P2", "iris", "Iris Shaders", "required", "unsupported"));
    let candidates = vec![client("Iris Shaders").with_registry_id("P2")];
    let metrics = Arc::new(ResolutionMetrics::new());
    let mut first: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory())
        .with_registry(registry, 100)
        .with_metrics(Arc::clone(&metrics));
    let first_records = block_on(first.resolve_all(&candidates));
    assert_eq!(first_records[0].provenance, Provenance::Registry);
    let calls = metrics.registry_calls.load(Ordering::Relaxed);

    let mut second: Resolver = IdentityResolver::new(knowledge(), first.into_cache())
        .with_registry(FakeRegistry::default(), 100)
        .with_metrics(Arc::clone(&metrics));
    let second_records = block_on(second.resolve_all(&candidates));

    assert_eq!(second_records, first_records);
    assert_eq!(metrics.registry_calls.load(Ordering::Relaxed), calls);
}

#[test]
fn test_server_only_alias_keeps_its_side_across_installations() {
    let registry = FakeRegistry::default().with_project(project("abc123", "chunky", "Chunky", "unsupported", "required"));
    let mut resolver: Resolver =
        IdentityResolver::new(knowledge(), ResolutionCache::in_memory()).with_registry(registry, 100);

    let on_client = block_on(resolver.resolve(&client("Chunky")));
    assert_eq!(on_client.side, Side::Both);
    assert_eq!(resolver.cache().get("chunky").unwrap().side, Side::Server);

    let on_server = block_on(resolver.resolve(&server("Chunky")));
    assert_eq!(on_server.provenance, Provenance::Alias);
    assert_eq!(on_server.side, Side::Server);
}

#[test]
fn test_server_only_registry_hit_keeps_its_side_across_installations() {
    let registry = FakeRegistry::default().with_project(project("T1", "tweaker", "Tweaker", "unsupported", "required"));
    let mut resolver: Resolver =
        IdentityResolver::new(knowledge(), ResolutionCache::in_memory()).with_registry(registry, 100);

    let on_client = block_on(resolver.resolve(&client("Tweaker").with_registry_id("T1")));
    assert_eq!(on_client.side, Side::Both);

    let on_server = block_on(resolver.resolve(&server("Tweaker")));
    assert_eq!(on_server.provenance, Provenance::Registry);
    assert_eq!(on_server.side, Side::Server);
}

#[test]
fn test_generative_side_cached_as_answered() {
    let answer = r#"{"desc": "Backs up worlds", "side": "server", "req": "optional"}"#;
    let mut resolver: Resolver = IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory())
        .with_generative(FakeGenerative::answering(answer), false);

    let on_client = block_on(resolver.resolve(&client("Backup Tool")));
    assert_eq!(on_client.side, Side::Both);
    assert_eq!(resolver.cache().get("backup tool").unwrap().side, Side::Server);

    let on_server = block_on(resolver.resolve(&server("Backup Tool")));
    assert_eq!(on_server.side, Side::Server);
    assert_eq!(resolver.metrics().generative_calls.load(Ordering::Relaxed), 1);
}

#[test]
fn test_batch_chunked_and_skips_local_hits() {
    let registry = FakeRegistry::default();
    let metrics = Arc::new(ResolutionMetrics::new());
    let mut resolver: Resolver = IdentityResolver::new(knowledge(), ResolutionCache::in_memory())
        .with_registry(registry, 2)
        .with_metrics(Arc::clone(&metrics));

    let candidates = vec![
        client("A Mod").with_registry_id("A"),
        client("B Mod").with_registry_id("B"),
        client("C Mod").with_registry_id("C"),
        client("Lithium").with_registry_id("L"),
    ];
    let records = block_on(resolver.resolve_all(&candidates));

    assert_eq!(records.iter().filter(|r| r.provenance == Provenance::Unknown).count(), 3);
    assert_eq!(metrics.unresolved.load(Ordering::Relaxed), 3);
    assert_eq!(metrics.static_hits.load(Ordering::Relaxed), 1);
    // Two batches for three ids, then one search per unresolved candidate.
    assert_eq!(metrics.registry_calls.load(Ordering::Relaxed), 5);
}

#[test]
fn test_search_selects_first_acceptable_hit() {
    let mut registry = FakeRegistry::default().with_project(project("V1", "simple-voice-chat", "Simple Voice Chat", "required", "required"));
    registry.hits = vec![
        SearchHit {
            project_id: "X".to_string(),
            slug: "unrelated".to_string(),
            title: "Unrelated".to_string(),
        },
        SearchHit {
            project_id: "V1".to_string(),
            slug: "simple-voice-chat".to_string(),
            title: "Simple Voice Chat".to_string(),
        },
    ];
    let mut resolver: Resolver =
        IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory()).with_registry(registry, 100);

    let record = block_on(resolver.resolve(&client("Simple Voice Chat")));

    assert_eq!(record.provenance, Provenance::Registry);
    assert_eq!(record.side, Side::Both);
    assert_eq!(record.registry.as_ref().unwrap().project_id, "V1");
}

#[test]
fn test_network_failure_falls_through_to_generative() {
    let registry = FakeRegistry {
        fail: true,
        ..FakeRegistry::default()
    };
    let generative = FakeGenerative::answering(r#"{"desc": "Adds backpacks", "side": "both", "req": "required"}"#);
    let metrics = Arc::new(ResolutionMetrics::new());
    let mut resolver: Resolver = IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory())
        .with_registry(registry, 100)
        .with_generative(generative, false)
        .with_metrics(Arc::clone(&metrics));

    let record = block_on(resolver.resolve(&server("Backpacked")));

    assert_eq!(record.provenance, Provenance::Generative);
    assert_eq!(record.description, "Adds backpacks");
    assert_eq!(record.requirement, Requirement::Required);
    assert!(metrics.network_failures.load(Ordering::Relaxed) >= 1);
}

#[test]
fn test_generative_guide_fields_attached() {
    let generative = FakeGenerative::answering(
        r#"{"desc": "Graves keep items", "side": "server", "req": "optional",
            "guide_section": "gameplay", "guide_name": "Graves", "guide_body": "Your items wait.", "guide_example": null}"#,
    );
    let mut resolver: Resolver =
        IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory()).with_generative(generative, true);

    let record = block_on(resolver.resolve(&client("Universal Graves")));

    // Found in the client folder, so never server-only.
    assert_eq!(record.side, Side::Both);
    assert_eq!(record.extended_fields["guide_section"].as_deref(), Some("gameplay"));
    assert_eq!(record.extended_fields["guide_example"], None);
}

#[test]
fn test_invalid_answer_yields_placeholder() {
    let generative = FakeGenerative::answering(r#"{"side": "both", "req": "optional"}"#);
    let metrics = Arc::new(ResolutionMetrics::new());
    let mut resolver: Resolver = IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory())
        .with_generative(generative, false)
        .with_metrics(Arc::clone(&metrics));

    let record = block_on(resolver.resolve(&server("Mystery")));

    assert_eq!(record.provenance, Provenance::Unknown);
    assert_eq!(record.side, Side::Server);
    assert_eq!(record.requirement, Requirement::Unknown);
    assert!(record.description.is_empty());
    assert_eq!(metrics.schema_failures.load(Ordering::Relaxed), 1);
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_unavailable_generative_skips_generation() {
    let generative = FakeGenerative {
        available: false,
        ..FakeGenerative::answering("{}")
    };
    let mut resolver: Resolver =
        IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory()).with_generative(generative, false);

    let records = block_on(resolver.resolve_all(&[server("One"), server("Two"), server("Three")]));

    assert!(records.iter().all(|r| r.provenance == Provenance::Unknown));
    assert_eq!(resolver.metrics().generative_calls.load(Ordering::Relaxed), 0);
}

#[test]
fn test_generative_cache_makes_rerun_idempotent() {
    let answer = r#"{"desc": "Shows armor durability", "side": "client", "req": "optional"}"#;
    let candidates = vec![client("Armor Hud"), client("armor hud")];

    let mut first: Resolver = IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory())
        .with_generative(FakeGenerative::answering(answer), false);
    let first_records = block_on(first.resolve_all(&candidates));
    assert_eq!(first_records.len(), 1);
    assert_eq!(first.metrics().generative_calls.load(Ordering::Relaxed), 1);

    let metrics = Arc::new(ResolutionMetrics::new());
    let mut second: Resolver = IdentityResolver::new(KnowledgeBase::empty(), first.into_cache())
        .with_generative(FakeGenerative::answering("not even json"), false)
        .with_metrics(Arc::clone(&metrics));
    let second_records = block_on(second.resolve_all(&candidates));

    assert_eq!(second_records, first_records);
    assert_eq!(metrics.generative_calls.load(Ordering::Relaxed), 0);
    assert_eq!(metrics.cache_hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_datapack_described_then_cached() {
    let generative = FakeGenerative::answering(
        r#"{"desc": "Villagers trade more", "guide_name": "Better Trades", "guide_body": null}"#,
    );
    let mut resolver: Resolver =
        IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory()).with_generative(generative, true);

    let first = block_on(resolver.resolve_datapack("Trade Tweaks", "Trade Tweaks v1.2"));
    assert_eq!(first.provenance, Provenance::Generative);
    assert_eq!(first.extended_fields["guide_name"].as_deref(), Some("Better Trades"));

    let again = block_on(resolver.resolve_datapack("Trade Tweaks", "trade tweaks v1.2"));
    assert_eq!(again.description, "Villagers trade more");
    assert_eq!(again.folder, "trade tweaks v1.2");
    assert_eq!(resolver.metrics().generative_calls.load(Ordering::Relaxed), 1);
}

#[test]
fn test_datapack_without_service_is_empty() {
    let mut resolver: Resolver = IdentityResolver::new(KnowledgeBase::empty(), ResolutionCache::in_memory());

    let record = block_on(resolver.resolve_datapack("Afk Display", "Afk Display"));
    assert_eq!(record.provenance, Provenance::Unknown);
    assert!(record.description.is_empty());
}

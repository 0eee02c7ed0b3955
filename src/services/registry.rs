//! Client for the add-on registry (Modrinth v2 API) and the throttle that paces it.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::models::{AddonCandidate, AddonRecord, Provenance, RegistryMeta, RegistrySettings, Requirement, Side};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("HTTP client could not be built: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registry returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// Enforces a minimum gap between two registry calls.
///
/// `last_call` is stamped when a call finishes, successful or not; the next call waits out
/// whatever remains of the interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Time still to wait at `now` before the next call may start.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_call {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub async fn wait_if_needed(&self) {
        let wait = self.remaining(Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    /// Record that a call just completed.
    pub fn mark(&mut self) {
        self.last_call = Some(Instant::now());
    }
}

/// A project as returned by `/project/{id}` and `/projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub client_side: String,
    pub server_side: String,
    pub categories: Vec<String>,
    pub additional_categories: Vec<String>,
    pub icon_url: Option<String>,
    pub source_url: Option<String>,
    pub wiki_url: Option<String>,
    pub issues_url: Option<String>,
}

fn is_supported(value: &str) -> bool {
    matches!(value, "required" | "optional")
}

impl Project {
    /// Installation surface from the client/server support flags.
    pub fn side(&self) -> Side {
        match (is_supported(&self.client_side), is_supported(&self.server_side)) {
            (true, false) => Side::Client,
            (false, true) => Side::Server,
            _ => Side::Both,
        }
    }

    /// `library` for library and API projects; everything else is treated as optional.
    pub fn requirement(&self) -> Requirement {
        let is_library = self
            .categories
            .iter()
            .chain(&self.additional_categories)
            .any(|c| c.eq_ignore_ascii_case("library") || c.eq_ignore_ascii_case("api"));
        if is_library {
            Requirement::Library
        } else {
            Requirement::Optional
        }
    }

    pub fn meta(&self) -> RegistryMeta {
        RegistryMeta {
            project_id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            categories: self
                .categories
                .iter()
                .chain(&self.additional_categories)
                .map(|c| c.to_lowercase())
                .collect(),
            icon_url: self.icon_url.clone().filter(|u| !u.is_empty()),
            source_url: self.source_url.clone().filter(|u| !u.is_empty()),
            wiki_url: self.wiki_url.clone().filter(|u| !u.is_empty()),
            issues_url: self.issues_url.clone().filter(|u| !u.is_empty()),
        }
    }

    /// The registry's own answer for `candidate`. The side is left as the registry reports it;
    /// callers apply the installation-context rule with [`AddonRecord::bind_to`].
    pub fn to_record(&self, candidate: &AddonCandidate, provenance: Provenance) -> AddonRecord {
        AddonRecord {
            side: self.side(),
            requirement: self.requirement(),
            description: self.description.clone(),
            provenance,
            registry: Some(self.meta()),
            ..AddonRecord::placeholder(candidate)
        }
    }
}

/// One entry of a `/search` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub project_id: String,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

/// Lowercase and drop spaces and apostrophes.
fn squash_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '\'')
        .collect()
}

fn squash_slug(value: &str) -> String {
    value.to_lowercase().replace('-', "")
}

fn related(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a == b || a.contains(b) || b.contains(a))
}

/// Pick the first acceptable hit for `name`; the first satisfying hit wins, not the best.
///
/// Pass one accepts a hit whose squashed slug or title equals, contains, or is contained in
/// the squashed name. Pass two needs a name of at least two words and accepts a hit whose
/// squashed title or slug contains each of the first two words.
pub fn select_best_hit<'a>(name: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let wanted = squash_name(name);

    let exact = hits.iter().find(|hit| {
        let slug = squash_slug(&hit.slug);
        let title = squash_name(&hit.title);
        related(&wanted, &slug) || related(&wanted, &title)
    });
    if exact.is_some() {
        return exact;
    }

    let lowered = name.to_lowercase().replace('\'', "");
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    hits.iter().find(|hit| {
        let slug = squash_slug(&hit.slug);
        let title = squash_name(&hit.title);
        words[..2].iter().all(|w| title.contains(w) || slug.contains(w))
    })
}

/// The registry operations the resolver depends on.
#[allow(async_fn_in_trait)]
pub trait RegistryApi {
    /// Batch fetch by project id. Unknown ids are simply absent from the result.
    async fn fetch_projects(&mut self, ids: &[String]) -> Result<Vec<Project>, RegistryError>;

    /// Fetch one project by id or slug; `None` when the registry doesn't know it.
    async fn fetch_project(&mut self, id_or_slug: &str) -> Result<Option<Project>, RegistryError>;

    /// Search by name within the configured loader category.
    async fn search(&mut self, query: &str) -> Result<Vec<SearchHit>, RegistryError>;
}

/// HTTP implementation of [`RegistryApi`].
pub struct RegistryClient {
    client: Client,
    base_url: String,
    loader: String,
    search_limit: usize,
    throttle: Throttle,
}

impl RegistryClient {
    pub fn new(settings: &RegistrySettings) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            loader: settings.loader.clone(),
            search_limit: settings.search_limit,
            throttle: Throttle::new(Duration::from_millis(settings.min_interval_ms)),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, RegistryError> {
        self.throttle.wait_if_needed().await;
        let result = self.send(path, query).await;
        self.throttle.mark();
        result
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>, RegistryError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<T>().await?)),
            status => Err(RegistryError::Status { status, url }),
        }
    }
}

impl RegistryApi for RegistryClient {
    async fn fetch_projects(&mut self, ids: &[String]) -> Result<Vec<Project>, RegistryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let encoded = serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string());
        let projects: Option<Vec<Project>> = self.get_json("/projects", &[("ids", encoded)]).await?;
        Ok(projects.unwrap_or_default())
    }

    async fn fetch_project(&mut self, id_or_slug: &str) -> Result<Option<Project>, RegistryError> {
        self.get_json(&format!("/project/{}", id_or_slug), &[]).await
    }

    async fn search(&mut self, query: &str) -> Result<Vec<SearchHit>, RegistryError> {
        let facets = format!("[[\"categories:{}\"]]", self.loader);
        let params = [
            ("query", query.to_string()),
            ("facets", facets),
            ("limit", self.search_limit.to_string()),
        ];
        let response: Option<SearchResponse> = self.get_json("/search", &params).await?;
        Ok(response.map(|r| r.hits).unwrap_or_default())
    }
}

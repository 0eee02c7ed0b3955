use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Lowercased, trimmed form of a display name; the primary key of every add-on.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Installation surface of an add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Client,
    Server,
    #[default]
    Both,
}

impl Side {
    /// Parse a side string, returning `None` for anything outside the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "client" => Some(Self::Client),
            "server" => Some(Self::Server),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
            Self::Both => "both",
        }
    }

    /// Coerce a side so it never contradicts where the add-on was found.
    ///
    /// A client-installed add-on can't be server-only and vice versa; the
    /// contradicting value widens to [`Side::Both`].
    pub fn constrained_to(self, context: InstallContext) -> Self {
        match (context, self) {
            (InstallContext::Client, Self::Server) => Self::Both,
            (InstallContext::Server, Self::Client) => Self::Both,
            (_, side) => side,
        }
    }
}

/// Which installation was being scanned when an add-on was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallContext {
    Client,
    Server,
}

impl InstallContext {
    /// The side an add-on gets when nothing else is known about it.
    pub fn side_hint(&self) -> Side {
        match self {
            Self::Client => Side::Client,
            Self::Server => Side::Server,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

/// How essential an add-on is to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
    Library,
    #[default]
    Unknown,
}

impl Requirement {
    /// Parse the three tiers a resolver may assert. `unknown` is never accepted from outside.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "library" => Some(Self::Library),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Library => "library",
            Self::Unknown => "unknown",
        }
    }
}

/// The resolution tier that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Static,
    Alias,
    Fuzzy,
    Registry,
    Generative,
    Manual,
    #[default]
    Unknown,
}

impl Provenance {
    /// Relative trust of a tier; a stored record is only replaced by one of equal or higher rank.
    pub fn confidence(&self) -> u8 {
        match self {
            Self::Static => 6,
            Self::Manual => 5,
            Self::Alias => 4,
            Self::Registry => 3,
            Self::Fuzzy => 2,
            Self::Generative => 1,
            Self::Unknown => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Alias => "alias",
            Self::Fuzzy => "fuzzy",
            Self::Registry => "registry",
            Self::Generative => "generative",
            Self::Manual => "manual",
            Self::Unknown => "unknown",
        }
    }
}

/// Project metadata carried over from a registry hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMeta {
    pub project_id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub wiki_url: Option<String>,
    #[serde(default)]
    pub issues_url: Option<String>,
}

/// One resolved add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonRecord {
    pub canonical_name: String,
    pub source_artifact: String,
    pub version: String,
    pub side: Side,
    pub requirement: Requirement,
    #[serde(default)]
    pub description: String,
    pub provenance: Provenance,
    /// Guide text fields; only the generative tier fills these.
    #[serde(default)]
    pub extended_fields: IndexMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryMeta>,
}

impl AddonRecord {
    /// The record produced when every tier came up empty.
    pub fn placeholder(candidate: &AddonCandidate) -> Self {
        Self {
            canonical_name: candidate.name.clone(),
            source_artifact: candidate.artifact.clone(),
            version: candidate.version.clone(),
            side: candidate.context.side_hint(),
            requirement: Requirement::Unknown,
            description: String::new(),
            provenance: Provenance::Unknown,
            extended_fields: IndexMap::new(),
            registry: None,
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.canonical_name)
    }

    pub fn is_placeholder(&self) -> bool {
        self.provenance == Provenance::Unknown
    }

    /// Re-anchor a record (possibly loaded from the cache) to the artifact found on disk
    /// in this run, enforcing the side rule for its installation context.
    pub fn bind_to(mut self, candidate: &AddonCandidate) -> Self {
        self.canonical_name = candidate.name.clone();
        self.source_artifact = candidate.artifact.clone();
        self.version = candidate.version.clone();
        self.side = self.side.constrained_to(candidate.context);
        self
    }
}

/// An add-on detected on disk, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonCandidate {
    pub name: String,
    pub artifact: String,
    pub version: String,
    pub context: InstallContext,
    /// Registry identifier when the sidecar index already knows it.
    pub registry_id: Option<String>,
}

impl AddonCandidate {
    pub fn new(name: impl Into<String>, artifact: impl Into<String>, version: impl Into<String>, context: InstallContext) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
            version: version.into(),
            context,
            registry_id: None,
        }
    }

    pub fn with_registry_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.registry_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// A world content pack (datapack) and its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatapackRecord {
    pub name: String,
    pub folder: String,
    #[serde(default)]
    pub description: String,
    pub provenance: Provenance,
    #[serde(default)]
    pub extended_fields: IndexMap<String, Option<String>>,
}

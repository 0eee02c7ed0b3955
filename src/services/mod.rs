//! Services module - the resolution pipeline and the collectors feeding the report.
//!
//! Nothing here renders output or reads settings; every input is an explicit parameter, so each
//! service can be driven from tests with a temp directory and in-memory knowledge.
//!
//! # Components
//!
//! - [`FilenameNormalizer`]: archive filename -> `(name, version)`, overrides first
//! - [`sidecar`]: the launcher's `.pw.toml` index of client add-ons
//! - [`AddonScanner`]: directory listings -> [`AddonCandidate`](crate::models::AddonCandidate)s
//! - [`IdentityResolver`]: the tiered chain (static, manual, alias, fuzzy, registry, generative)
//!   backed by the [`ResolutionCache`]
//! - [`RegistryClient`] / [`GenerativeClient`]: the two network services, behind the
//!   [`RegistryApi`] / [`GenerativeApi`] traits
//! - [`nbt`]: gzip tagged-tree reader (and writer) for `level.dat`
//! - [`DiffEngine`]: server properties and gamerules against vanilla defaults
//! - [`config_mapper`]: config file -> owning add-on
//! - [`players`]: the player aggregator
//! - [`DatapackNamer`]: world datapack listing
//!
//! # Failure handling
//!
//! Network failures fall through to the next tier, decode failures drop the gamerule section,
//! and missing inputs produce empty results. None of them abort a run.

pub mod cache;
pub mod config_mapper;
pub mod datapacks;
pub mod diff;
pub mod generative;
pub mod nbt;
pub mod normalizer;
pub mod players;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod sidecar;

pub use cache::{CacheDocument, ResolutionCache};
pub use config_mapper::{collect_configs, group_by_owner, owner_of};
pub use datapacks::{DatapackFolder, DatapackNamer};
pub use diff::{DiffEngine, collect_gamerules, collect_server_properties};
pub use generative::{GenerativeApi, GenerativeClient, GenerativeError};
pub use nbt::{NbtError, Tag};
pub use normalizer::{FilenameNormalizer, UNKNOWN_VERSION};
pub use players::collect_players;
pub use registry::{RegistryApi, RegistryClient, RegistryError, Throttle};
pub use resolver::IdentityResolver;
pub use scanner::AddonScanner;
pub use sidecar::{SidecarEntry, read_index};

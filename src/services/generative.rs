//! Fallback descriptions from a locally hosted language model (Ollama HTTP API).
//!
//! Answers are requested as JSON and validated field by field before anything is kept: a
//! missing required field rejects the whole answer, while out-of-range enum values are
//! coerced to safe defaults.

use indexmap::IndexMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

use crate::models::{AddonCandidate, GenerativeSettings, Requirement, Side};

/// Report sections a guide entry may be filed under.
pub const GUIDE_SECTIONS: &[&str] = &[
    "first-join",
    "gameplay",
    "travel",
    "world-gen",
    "ui",
    "datapacks",
    "behind-scenes",
];

pub const FIELD_GUIDE_SECTION: &str = "guide_section";
pub const FIELD_GUIDE_NAME: &str = "guide_name";
pub const FIELD_GUIDE_BODY: &str = "guide_body";
pub const FIELD_GUIDE_EXAMPLE: &str = "guide_example";

#[derive(Error, Debug)]
pub enum GenerativeError {
    #[error("Generative service unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generative service returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Response rejected: {0}")]
    Schema(String),
}

/// A validated add-on answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonAnswer {
    pub description: String,
    pub side: Side,
    pub requirement: Requirement,
    /// Guide fields, present only when the guide variant was requested.
    pub guide: IndexMap<String, Option<String>>,
}

/// A validated datapack answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatapackAnswer {
    pub description: String,
    pub guide: IndexMap<String, Option<String>>,
}

/// Prompt for an add-on. The guide variant also asks for a report section and guide text.
pub fn addon_prompt(candidate: &AddonCandidate, guide: bool) -> String {
    let mut prompt = format!(
        "You are a Minecraft Fabric modding expert. I need information about this Fabric mod.\n\n\
         Mod name: {}\nJar filename: {}\nInstalled on: {} side\n\n\
         Return ONLY a JSON object with these exact fields:\n{{\n\
         \x20 \"desc\": \"One concise sentence describing what this mod does for players (max 120 chars)\",\n\
         \x20 \"side\": \"client\" or \"server\" or \"both\",\n\
         \x20 \"req\": \"required\" or \"optional\" or \"library\"",
        candidate.name,
        candidate.artifact,
        candidate.context.as_str()
    );

    if guide {
        let sections = GUIDE_SECTIONS
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            ",\n  \"guide_section\": one of {}, or null,\n\
             \x20 \"guide_name\": \"Short display name for beginner guide entry\",\n\
             \x20 \"guide_body\": \"2-3 sentences for someone new to the server. Use <em> for emphasis. Be specific.\",\n\
             \x20 \"guide_example\": \"A concrete example or null\"",
            sections
        ));
    }

    prompt.push_str(
        "\n}\n\nRules:\n\
         - \"req\" = \"library\" for API/library mods players never interact with\n\
         - \"req\" = \"required\" for mods that add content players must deal with\n\
         - \"req\" = \"optional\" for quality-of-life mods\n",
    );
    if guide {
        prompt.push_str(
            "- \"guide_section\" = null for library mods and invisible server-side mods\n\
             - For performance mods use \"behind-scenes\"\n\
             - For world generation mods use \"world-gen\"\n",
        );
    }
    prompt.push_str("- Keep everything concise and beginner-friendly");
    prompt
}

/// Prompt for a datapack folder.
pub fn datapack_prompt(folder: &str) -> String {
    format!(
        "You are a Minecraft datapack expert. I need info about this datapack on a Fabric server.\n\n\
         Datapack name/folder: {}\n\n\
         Return ONLY a JSON object:\n{{\n\
         \x20 \"desc\": \"One concise sentence describing what this datapack does\",\n\
         \x20 \"guide_name\": \"Short display name for the beginner guide\",\n\
         \x20 \"guide_body\": \"2-3 sentences for beginners. Use <em> for emphasis.\",\n\
         \x20 \"guide_example\": \"A concrete example or null\"\n\
         }}\n\n\
         Keep it concise and beginner-friendly.",
        folder
    )
}

fn parse_object(raw: &str) -> Result<serde_json::Map<String, Value>, GenerativeError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GenerativeError::Schema("answer is not a JSON object".to_string())),
        Err(e) => Err(GenerativeError::Schema(format!("answer is not JSON: {}", e))),
    }
}

fn required_string(map: &serde_json::Map<String, Value>, field: &str) -> Result<String, GenerativeError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(GenerativeError::Schema(format!("field '{}' is not a string", field))),
        None => Err(GenerativeError::Schema(format!("missing field '{}'", field))),
    }
}

fn require_present<'a>(map: &'a serde_json::Map<String, Value>, field: &str) -> Result<&'a Value, GenerativeError> {
    map.get(field)
        .ok_or_else(|| GenerativeError::Schema(format!("missing field '{}'", field)))
}

/// A string field, or `None` for null, absent or non-string values.
fn optional_string(map: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    map.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Validate an add-on answer.
///
/// `desc`, `side` and `req` must be present. An unknown side falls back to `side_hint`, an
/// unknown requirement to `optional`, an unknown guide section to `None`.
pub fn validate_addon_response(raw: &str, side_hint: Side, guide: bool) -> Result<AddonAnswer, GenerativeError> {
    let map = parse_object(raw)?;

    let description = required_string(&map, "desc")?;
    let side = require_present(&map, "side")?
        .as_str()
        .and_then(Side::parse)
        .unwrap_or(side_hint);
    let requirement = require_present(&map, "req")?
        .as_str()
        .and_then(Requirement::parse)
        .unwrap_or(Requirement::Optional);

    let mut fields = IndexMap::new();
    if guide {
        let section = optional_string(&map, FIELD_GUIDE_SECTION).filter(|s| GUIDE_SECTIONS.contains(&s.as_str()));
        fields.insert(FIELD_GUIDE_SECTION.to_string(), section);
        for field in [FIELD_GUIDE_NAME, FIELD_GUIDE_BODY, FIELD_GUIDE_EXAMPLE] {
            fields.insert(field.to_string(), optional_string(&map, field));
        }
    }

    Ok(AddonAnswer {
        description,
        side,
        requirement,
        guide: fields,
    })
}

/// Validate a datapack answer; `desc` and `guide_name` must be present.
pub fn validate_datapack_response(raw: &str) -> Result<DatapackAnswer, GenerativeError> {
    let map = parse_object(raw)?;

    let description = required_string(&map, "desc")?;
    require_present(&map, FIELD_GUIDE_NAME)?;

    let mut fields = IndexMap::new();
    for field in [FIELD_GUIDE_NAME, FIELD_GUIDE_BODY, FIELD_GUIDE_EXAMPLE] {
        fields.insert(field.to_string(), optional_string(&map, field));
    }

    Ok(DatapackAnswer {
        description,
        guide: fields,
    })
}

/// Whether `model` is among the loaded models, matching its base name (before `:`) as a
/// substring so tag suffixes like `-instruct` still count.
pub fn model_is_loaded(model: &str, loaded: &[String]) -> bool {
    let base = model.split(':').next().unwrap_or(model);
    if base.is_empty() {
        return false;
    }
    loaded.iter().any(|name| name.contains(base))
}

/// The generative operations the resolver depends on.
#[allow(async_fn_in_trait)]
pub trait GenerativeApi {
    /// Whether the service answers and has the configured model loaded.
    async fn is_available(&mut self) -> bool;

    /// Run one prompt, returning the raw JSON text of the answer.
    async fn generate(&mut self, prompt: &str) -> Result<String, GenerativeError>;
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP implementation of [`GenerativeApi`].
pub struct GenerativeClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    health_timeout: Duration,
    generate_timeout: Duration,
}

impl GenerativeClient {
    pub fn new(settings: &GenerativeSettings) -> Result<Self, GenerativeError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerativeError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            health_timeout: Duration::from_secs(settings.health_timeout_secs),
            generate_timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    async fn loaded_models(&self) -> Result<Vec<String>, GenerativeError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).timeout(self.health_timeout).send().await?;
        if !response.status().is_success() {
            return Err(GenerativeError::Status {
                status: response.status(),
                url,
            });
        }
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl GenerativeApi for GenerativeClient {
    async fn is_available(&mut self) -> bool {
        match self.loaded_models().await {
            Ok(models) => {
                let loaded = model_is_loaded(&self.model, &models);
                if !loaded {
                    tracing::warn!("Model {} is not loaded (have: {})", self.model, models.join(", "));
                }
                loaded
            }
            Err(e) => {
                tracing::warn!("Generative service not reachable: {}", e);
                false
            }
        }
    }

    async fn generate(&mut self, prompt: &str) -> Result<String, GenerativeError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
            "options": { "temperature": self.temperature },
        });

        let response = self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GenerativeError::Status {
                status: response.status(),
                url,
            });
        }

        let answer: GenerateResponse = response.json().await?;
        if answer.response.trim().is_empty() {
            return Err(GenerativeError::Schema("empty answer".to_string()));
        }
        Ok(answer.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstallContext;

    #[test]
    fn test_valid_guide_answer() {
        let raw = r#"{"desc":"Adds waystones","side":"both","req":"required",
            "guide_section":"travel","guide_name":"Waystones","guide_body":"Teleport.","guide_example":null}"#;
        let answer = validate_addon_response(raw, Side::Client, true).unwrap();

        assert_eq!(answer.description, "Adds waystones");
        assert_eq!(answer.side, Side::Both);
        assert_eq!(answer.requirement, Requirement::Required);
        assert_eq!(answer.guide.get(FIELD_GUIDE_SECTION), Some(&Some("travel".to_string())));
        assert_eq!(answer.guide.get(FIELD_GUIDE_EXAMPLE), Some(&None));
    }

    #[test]
    fn test_missing_required_field_rejects_whole_answer() {
        let raw = r#"{"desc":"Something","side":"client"}"#;
        let result = validate_addon_response(raw, Side::Client, true);
        assert!(matches!(result, Err(GenerativeError::Schema(_))));
    }

    #[test]
    fn test_invalid_enums_coerced() {
        let raw = r#"{"desc":"x","side":"everywhere","req":"mandatory","guide_section":"lobby"}"#;
        let answer = validate_addon_response(raw, Side::Server, true).unwrap();

        assert_eq!(answer.side, Side::Server);
        assert_eq!(answer.requirement, Requirement::Optional);
        assert_eq!(answer.guide.get(FIELD_GUIDE_SECTION), Some(&None));
    }

    #[test]
    fn test_basic_variant_has_no_guide_fields() {
        let raw = r#"{"desc":"x","side":"client","req":"library","guide_name":"ignored"}"#;
        let answer = validate_addon_response(raw, Side::Client, false).unwrap();
        assert!(answer.guide.is_empty());
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(validate_addon_response("Sure! Here is the JSON", Side::Both, false).is_err());
        assert!(validate_addon_response("[1,2]", Side::Both, false).is_err());
    }

    #[test]
    fn test_datapack_requires_guide_name() {
        assert!(validate_datapack_response(r#"{"desc":"Adds trades"}"#).is_err());

        let answer = validate_datapack_response(r#"{"desc":"Adds trades","guide_name":"More Trades"}"#).unwrap();
        assert_eq!(answer.guide.get(FIELD_GUIDE_NAME), Some(&Some("More Trades".to_string())));
        assert_eq!(answer.guide.get(FIELD_GUIDE_BODY), Some(&None));
    }

    #[test]
    fn test_model_is_loaded_tolerates_tags() {
        let loaded = vec!["qwen2.5:14b-instruct-q4_K_M".to_string(), "llama3:8b".to_string()];
        assert!(model_is_loaded("qwen2.5:14b", &loaded));
        assert!(!model_is_loaded("mistral:7b", &loaded));
        assert!(!model_is_loaded(":latest", &loaded));
    }

    #[test]
    fn test_prompts_mention_inputs() {
        let candidate = AddonCandidate::new("Bobby", "bobby-5.2.jar", "5.2", InstallContext::Client);
        let prompt = addon_prompt(&candidate, true);
        assert!(prompt.contains("Mod name: Bobby"));
        assert!(prompt.contains("Installed on: client side"));
        assert!(prompt.contains("\"behind-scenes\""));

        let basic = addon_prompt(&candidate, false);
        assert!(!basic.contains("guide_section"));

        assert!(datapack_prompt("VanillaTweaks v1.2").contains("Datapack name/folder: VanillaTweaks v1.2"));
    }
}

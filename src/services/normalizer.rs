use regex::Regex;

use crate::knowledge::KnowledgeBase;

/// Version string used when a filename carries no `digits.digits` token.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Turns archive filenames into display names and version strings.
///
/// Patterns are compiled once at construction:
///
/// - `extension`: `.jar` / `.zip`, optionally preceded by `.mod`
/// - `loader_prefix`: a leading bracketed tag such as `[Fabric]`
/// - `version_suffix`: the first `[-_ ]` followed by a digit-led token, plus any further
///   separator-delimited tokens that also carry a digit, up to the end
/// - `mc_infix`: `-mc1.21.11` style game-version tokens
/// - `loader_infix`: runs of `-fabric`, `_neoforge`, `-forge`, `-quilt`
/// - `version`: the first `digits.digits` run with its trailing version characters
pub struct FilenameNormalizer {
    extension: Regex,
    loader_prefix: Regex,
    version_suffix: Regex,
    mc_infix: Regex,
    loader_infix: Regex,
    separators: Regex,
    version: Regex,
}

impl FilenameNormalizer {
    pub fn new() -> Self {
        Self {
            extension: Regex::new(r"(?i)(\.mod)?\.(jar|zip)$").expect("Invalid extension regex"),
            loader_prefix: Regex::new(r"^\[[^\]]*\]").expect("Invalid loader prefix regex"),
            version_suffix: Regex::new(r"(?i)[-_ ]v?\d[\w.+\-]*(?:[-_ ]+[a-z]?\d[\w.+\-]*)*$")
                .expect("Invalid version suffix regex"),
            mc_infix: Regex::new(r"(?i)[-_]mc\d+[\d.]*").expect("Invalid mc infix regex"),
            loader_infix: Regex::new(r"(?i)([-_](fabric|neoforge|forge|quilt))+([-_]|$)")
                .expect("Invalid loader infix regex"),
            separators: Regex::new(r"[-_\s]+").expect("Invalid separator regex"),
            version: Regex::new(r"(\d+\.\d+[\w.+\-]*)").expect("Invalid version regex"),
        }
    }

    /// Split an archive filename into `(name, version)`.
    ///
    /// An exact filename in the override table wins outright; otherwise the name comes from
    /// the stripping heuristics and the version from [`version_from_jar`](Self::version_from_jar).
    pub fn normalize(&self, knowledge: &KnowledgeBase, filename: &str) -> (String, String) {
        if let Some(entry) = knowledge.filename_override(filename) {
            return (entry.name.clone(), entry.version.clone());
        }
        (self.name_from_jar(filename), self.version_from_jar(filename))
    }

    /// The heuristic display name, ignoring overrides.
    pub fn name_from_jar(&self, filename: &str) -> String {
        let stem = self.extension.replace(filename, "");
        let name = self.loader_prefix.replace(&stem, "");
        let name = self.version_suffix.replace(&name, "");
        let name = self.mc_infix.replace_all(&name, "");
        let name = self.loader_infix.replace_all(&name, "-");
        let name = self.separators.replace_all(&name, " ");

        let titled = title_case(name.trim());
        if titled.is_empty() {
            // Everything looked like version noise; the stem is still better than nothing.
            return stem.trim().to_string();
        }
        titled
    }

    /// First `digits.digits...` token of the filename, or [`UNKNOWN_VERSION`].
    pub fn version_from_jar(&self, filename: &str) -> String {
        let stem = self.extension.replace(filename, "");
        self.version
            .captures(&stem)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }
}

impl Default for FilenameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase the first character of every word and lowercase the rest.
fn title_case(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

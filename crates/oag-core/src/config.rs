use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de;
use serde::{Deserialize, Deserializer};

/// A tool setting that can be a named tool or explicitly disabled.
///
/// In YAML: `"biome"` → `Named("biome")`, `false` → `Disabled`.
/// `true` or absent → treated as "use default" (represented as `None` at the Option level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSetting {
    Named(String),
    Disabled,
}

impl ToolSetting {
    /// Resolve with a default: `None` → `Some(default)`, `Named(s)` → `Some(s)`, `Disabled` → `None`.
    pub fn resolve<'a>(setting: Option<&'a Self>, default: &'a str) -> Option<&'a str> {
        match setting {
            None => Some(default),
            Some(ToolSetting::Named(s)) => Some(s.as_str()),
            Some(ToolSetting::Disabled) => None,
        }
    }
}

impl<'de> Deserialize<'de> for ToolSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer).map_err(de::Error::custom)?;
        match value {
            serde_json::Value::String(s) => Ok(ToolSetting::Named(s)),
            serde_json::Value::Bool(false) => Ok(ToolSetting::Disabled),
            serde_json::Value::Bool(true) => {
                // true means "use default" — caller should treat as absent
                Err(de::Error::custom(
                    "use `false` to disable or a string to name the tool; `true` is treated as default (omit the field)",
                ))
            }
            _ => Err(de::Error::custom(
                "expected a tool name string or `false` to disable",
            )),
        }
    }
}

/// Strip a leading `./` from a configured source directory so `"./src"` and
/// `"src"` are equivalent everywhere downstream.
fn deserialize_source_dir<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_source_dir(&raw))
}

fn normalize_source_dir(raw: &str) -> String {
    raw.strip_prefix("./").unwrap_or(raw).to_string()
}

/// Top-level project configuration loaded from `.urmzd.oag.yaml`.
#[derive(Debug, Clone)]
pub struct OagConfig {
    pub input: String,
    pub naming: NamingConfig,
    pub generators: IndexMap<GeneratorId, GeneratorConfig>,
}

impl Default for OagConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            naming: NamingConfig::default(),
            generators: IndexMap::new(),
        }
    }
}

/// A generator plugin identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorId {
    NodeClient,
    ReactSwrClient,
}

impl GeneratorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorId::NodeClient => "node-client",
            GeneratorId::ReactSwrClient => "react-swr-client",
        }
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for GeneratorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "node-client" => Ok(GeneratorId::NodeClient),
            "react-swr-client" => Ok(GeneratorId::ReactSwrClient),
            other => Err(de::Error::unknown_variant(
                other,
                &["node-client", "react-swr-client"],
            )),
        }
    }
}

/// Configuration for a single generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output: String,
    pub layout: OutputLayout,
    pub split_by: Option<SplitBy>,
    pub base_url: Option<String>,
    pub no_jsdoc: Option<bool>,
    /// Subdirectory for generated source files. Default `"src"`.
    /// Empty string `""` places files at the output root. A leading `./` is
    /// stripped at load time so `"./src"` and `"src"` behave identically.
    #[serde(deserialize_with = "deserialize_source_dir")]
    pub source_dir: String,
    /// Regex patterns matched against operation tags. An operation is kept
    /// only if at least one of its tags matches one of these (empty = keep
    /// all). Untagged operations are treated as tagged `misc`.
    pub include_tags: Vec<String>,
    /// Regex patterns matched against operation tags; a match excludes the
    /// operation even if it also matched `include_tags`.
    pub exclude_tags: Vec<String>,
    /// Model names the emitter should treat as already provided by an
    /// external package instead of generating a local definition for them.
    pub predefined_types: Vec<PredefinedType>,
    /// Path globs (relative to `output`) the emitter must never write to,
    /// even if a layout would otherwise produce a file at that path.
    pub exclude: Vec<String>,
    /// Whether to invoke the configured formatter after writing files.
    /// Formatter failures are always non-fatal regardless of this flag;
    /// setting it to `false` skips invoking the formatter at all.
    pub format_code: bool,
    /// Whether to emit `schema.validation.*` runtime (zod) schemas alongside
    /// the plain type definitions. Optional per §4.4 — off by default.
    pub emit_validation: bool,
    /// Pass-through package.json `dependencies`, merged with whatever the
    /// generator itself needs (swr, zod, ...).
    pub dependencies: IndexMap<String, String>,
    /// Pass-through package.json `devDependencies`.
    pub dev_dependencies: IndexMap<String, String>,
    /// Opaque scaffold config — each generator defines and parses its own struct.
    pub scaffold: Option<serde_json::Value>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: "src/generated".to_string(),
            layout: OutputLayout::Modular,
            split_by: None,
            base_url: None,
            no_jsdoc: None,
            source_dir: "src".to_string(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            predefined_types: Vec::new(),
            exclude: Vec::new(),
            format_code: true,
            emit_validation: false,
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
            scaffold: None,
        }
    }
}

/// A model name declared as coming from an external package rather than
/// being emitted by this generator.
#[derive(Debug, Clone, Deserialize)]
pub struct PredefinedType {
    #[serde(rename = "type")]
    pub type_name: String,
    pub package: String,
}

/// How generated files are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// All files concatenated into one output file + scaffold.
    Bundled,
    /// Current behavior: types.ts, client.ts, sse.ts, index.ts.
    Modular,
    /// Per-group files with shared base.
    Split,
}

/// How to split operations into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitBy {
    /// Group by operation (one file per operation).
    Operation,
    /// Group by tag (reuse IrModule).
    Tag,
    /// Group by path prefix.
    Route,
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from resolved operation name (operationId or route-derived) to custom alias.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strategy: NamingStrategy::UseOperationId,
            aliases: IndexMap::new(),
        }
    }
}

/// How operation names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    UseOperationId,
    UseRouteBased,
}

// --- Backward-compatible deserialization ---
// Old format had: input, output, target, naming, output_options, client
// New format has: input, naming, generators (map of GeneratorId -> GeneratorConfig)
// We support both.

/// Internal legacy config format for backward compat parsing.
#[derive(Deserialize)]
struct LegacyConfig {
    #[serde(default = "default_input")]
    input: String,
    #[serde(default = "default_output")]
    output: String,
    #[serde(default)]
    target: LegacyTargetKind,
    #[serde(default)]
    naming: NamingConfig,
    #[serde(default)]
    output_options: LegacyOutputOptions,
    #[serde(default)]
    client: LegacyClientConfig,
}

fn default_input() -> String {
    "openapi.yaml".to_string()
}
fn default_output() -> String {
    "src/generated".to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum LegacyTargetKind {
    Typescript,
    React,
    #[default]
    All,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct LegacyOutputOptions {
    layout: LegacyOutputLayout,
    index: bool,
    biome: bool,
    tsdown: bool,
    package_name: Option<String>,
    repository: Option<String>,
}

impl Default for LegacyOutputOptions {
    fn default() -> Self {
        Self {
            layout: LegacyOutputLayout::Single,
            index: true,
            biome: true,
            tsdown: true,
            package_name: None,
            repository: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LegacyOutputLayout {
    #[default]
    Single,
    Split,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LegacyClientConfig {
    base_url: Option<String>,
    no_jsdoc: bool,
}

/// Internal new-format config for forward parsing.
#[derive(Deserialize)]
struct NewConfig {
    #[serde(default = "default_input")]
    input: String,
    #[serde(default)]
    naming: NamingConfig,
    generators: IndexMap<GeneratorId, GeneratorConfig>,
}

impl<'de> Deserialize<'de> for OagConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // We deserialize into a generic map first to detect the format.
        let value = serde_json::Value::deserialize(deserializer).map_err(de::Error::custom)?;

        // Check if the config has a "generators" key — that's the new format.
        if value.get("generators").is_some() {
            let new_cfg: NewConfig = serde_json::from_value(value).map_err(de::Error::custom)?;
            Ok(OagConfig {
                input: new_cfg.input,
                naming: new_cfg.naming,
                generators: new_cfg.generators,
            })
        } else {
            // Legacy format
            let legacy: LegacyConfig = serde_json::from_value(value).map_err(de::Error::custom)?;
            Ok(convert_legacy(legacy))
        }
    }
}

fn convert_legacy(legacy: LegacyConfig) -> OagConfig {
    let scaffold = Some(serde_json::json!({
        "package_name": legacy.output_options.package_name,
        "repository": legacy.output_options.repository,
        "index": legacy.output_options.index,
        "formatter": if legacy.output_options.biome { serde_json::Value::String("biome".into()) } else { serde_json::Value::Bool(false) },
        "bundler": if legacy.output_options.tsdown { serde_json::Value::String("tsdown".into()) } else { serde_json::Value::Bool(false) },
        "test_runner": serde_json::Value::String("vitest".into()),
    }));

    let base_gen_config = |output: String| GeneratorConfig {
        output,
        layout: OutputLayout::Modular,
        split_by: None,
        base_url: legacy.client.base_url.clone(),
        no_jsdoc: Some(legacy.client.no_jsdoc),
        source_dir: "src".to_string(),
        include_tags: Vec::new(),
        exclude_tags: Vec::new(),
        predefined_types: Vec::new(),
        exclude: Vec::new(),
        format_code: true,
        emit_validation: false,
        dependencies: IndexMap::new(),
        dev_dependencies: IndexMap::new(),
        scaffold: scaffold.clone(),
    };

    let mut generators = IndexMap::new();

    match (&legacy.target, &legacy.output_options.layout) {
        (LegacyTargetKind::Typescript, _) => {
            generators.insert(
                GeneratorId::NodeClient,
                base_gen_config(legacy.output.clone()),
            );
        }
        (LegacyTargetKind::React, _) => {
            generators.insert(
                GeneratorId::ReactSwrClient,
                base_gen_config(legacy.output.clone()),
            );
        }
        (LegacyTargetKind::All, LegacyOutputLayout::Single) => {
            // In single layout with target=all, the old behavior was to put
            // everything together using the React generator (which includes TS files).
            // Map this to a single react-swr-client generator.
            generators.insert(
                GeneratorId::ReactSwrClient,
                base_gen_config(legacy.output.clone()),
            );
        }
        (LegacyTargetKind::All, LegacyOutputLayout::Split) => {
            let ts_output = format!("{}/typescript", legacy.output);
            let react_output = format!("{}/react", legacy.output);
            generators.insert(GeneratorId::NodeClient, base_gen_config(ts_output));
            generators.insert(GeneratorId::ReactSwrClient, base_gen_config(react_output));
        }
    }

    OagConfig {
        input: legacy.input,
        naming: legacy.naming,
        generators,
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".urmzd.oag.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OagConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;

    // Parse YAML to serde_json::Value first, then use our custom Deserialize impl
    let yaml_value: serde_json::Value = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    let config: OagConfig = serde_json::from_value(yaml_value)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content (new format).
pub fn default_config_content() -> &'static str {
    include_str!("../default-config.yaml")
}

use minijinja::{Environment, context};
use oag_core::GeneratedFile;
use oag_core::config::ToolSetting;
use serde::Deserialize;

/// A `name@version` pair rendered into `package.json`'s dependency maps.
#[derive(Debug, Clone, serde::Serialize)]
struct Dependency {
    name: String,
    version: String,
}

/// Node/TS-specific scaffold configuration, parsed from the opaque `serde_json::Value`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeScaffoldConfig {
    pub package_name: Option<String>,
    pub repository: Option<String>,
    pub index: Option<bool>,
    pub formatter: Option<ToolSetting>,
    pub test_runner: Option<ToolSetting>,
    pub bundler: Option<ToolSetting>,
}

/// Options controlling which scaffold files to generate.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Spec title, used as fallback for package name.
    pub name: String,
    /// Custom package name override (if None, derives from spec title).
    pub package_name: Option<String>,
    /// Repository URL for package.json.
    pub repository: Option<String>,
    /// Formatter tool name (e.g. "biome") or None if disabled.
    pub formatter: Option<String>,
    /// Test runner tool name (e.g. "vitest") or None if disabled.
    pub test_runner: Option<String>,
    /// Bundler tool name (e.g. "tsdown") or None if disabled.
    pub bundler: Option<String>,
    /// Whether React target is included.
    pub react: bool,
    /// Whether `schema.validation.ts` (zod) is emitted; adds the `zod` dependency.
    pub validation: bool,
    /// Pass-through `dependencies` from the target config.
    pub extra_dependencies: Vec<(String, String)>,
    /// Pass-through `devDependencies` from the target config.
    pub extra_dev_dependencies: Vec<(String, String)>,
}

/// Merge the generator's own required dependency with any user-declared
/// pass-through dependencies, sorted by name for deterministic output. User
/// entries win on name collision, since they're explicit overrides.
fn merge_deps(built_in: &[(&str, &str)], extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut map: std::collections::BTreeMap<String, String> = built_in
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    for (name, version) in extra {
        map.insert(name.clone(), version.clone());
    }
    map.into_iter().collect()
}

/// Generate project scaffold files (package.json, tsconfig.json, biome.json, tsdown.config.ts).
pub fn emit_scaffold(options: &ScaffoldOptions) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    // package.json
    files.push(GeneratedFile {
        path: "package.json".to_string(),
        content: emit_package_json(options),
    });

    // tsconfig.json
    files.push(GeneratedFile {
        path: "tsconfig.json".to_string(),
        content: emit_tsconfig(options),
    });

    // biome.json (optional)
    if options.formatter.as_deref() == Some("biome") {
        files.push(GeneratedFile {
            path: "biome.json".to_string(),
            content: emit_biome(),
        });
    }

    // tsdown.config.ts (optional)
    if options.bundler.as_deref() == Some("tsdown") {
        files.push(GeneratedFile {
            path: "tsdown.config.ts".to_string(),
            content: emit_tsdown(),
        });
    }

    files
}

fn emit_package_json(options: &ScaffoldOptions) -> String {
    let mut env = Environment::new();
    env.add_template(
        "package.json.j2",
        include_str!("../../templates/package.json.j2"),
    )
    .expect("template should be valid");
    let tmpl = env.get_template("package.json.j2").unwrap();

    let pkg_name = options
        .package_name
        .clone()
        .unwrap_or_else(|| slugify(&options.name));

    let biome = options.formatter.as_deref() == Some("biome");
    let vitest = options.test_runner.as_deref() == Some("vitest");
    let tsdown = options.bundler.as_deref() == Some("tsdown");

    let mut built_in_deps: Vec<(&str, &str)> = Vec::new();
    if options.react {
        built_in_deps.push(("swr", "^2.2.0"));
    }
    if options.validation {
        built_in_deps.push(("zod", "^3.23.0"));
    }
    let dependencies: Vec<Dependency> = merge_deps(&built_in_deps, &options.extra_dependencies)
        .into_iter()
        .map(|(name, version)| Dependency { name, version })
        .collect();

    let mut built_in_dev_deps: Vec<(&str, &str)> = vec![("typescript", "^5.5.0")];
    if tsdown {
        built_in_dev_deps.push(("tsdown", "^0.6.0"));
    }
    if vitest {
        built_in_dev_deps.push(("vitest", "^2.1.0"));
    }
    if biome {
        built_in_dev_deps.push(("@biomejs/biome", "^1.9.0"));
    }
    if options.react {
        built_in_dev_deps.push(("@types/react", "^18.3.0"));
        built_in_dev_deps.push(("react", "^18.3.0"));
    }
    let dev_dependencies: Vec<Dependency> =
        merge_deps(&built_in_dev_deps, &options.extra_dev_dependencies)
            .into_iter()
            .map(|(name, version)| Dependency { name, version })
            .collect();

    tmpl.render(context! {
        name => pkg_name,
        repository => options.repository,
        biome => biome,
        vitest => vitest,
        tsdown => tsdown,
        dependencies => dependencies,
        dev_dependencies => dev_dependencies,
    })
    .expect("render should succeed")
}

fn emit_tsconfig(options: &ScaffoldOptions) -> String {
    let mut env = Environment::new();
    env.add_template(
        "tsconfig.json.j2",
        include_str!("../../templates/tsconfig.json.j2"),
    )
    .expect("template should be valid");
    let tmpl = env.get_template("tsconfig.json.j2").unwrap();

    tmpl.render(context! {
        react => options.react,
    })
    .expect("render should succeed")
}

fn emit_biome() -> String {
    include_str!("../../templates/biome.json.j2").to_string()
}

fn emit_tsdown() -> String {
    include_str!("../../templates/tsdown.config.ts.j2").to_string()
}

/// Convert a title to a kebab-case package name.
fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    // Collapse consecutive dashes and trim
    let mut result = String::new();
    let mut prev_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !prev_dash && !result.is_empty() {
                result.push('-');
            }
            prev_dash = true;
        } else {
            result.push(c);
            prev_dash = false;
        }
    }

    result.trim_end_matches('-').to_string()
}

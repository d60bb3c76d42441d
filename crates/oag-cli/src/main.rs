use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use oag_core::config::{self, CONFIG_FILE_NAME, GeneratorConfig, GeneratorId, OagConfig};
use oag_core::ir::IrSpec;
use oag_core::parse;
use oag_core::transform::{self, TransformOptions};
use oag_core::{CodeGenerator, GeneratedFile};
use oag_node_client::NodeClientGenerator;
use oag_react_swr_client::ReactSwrClientGenerator;

#[derive(Parser)]
#[command(name = "oag", about = "OpenAPI 3.2 code generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client code from an OpenAPI spec for every configured generator
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON); overrides the config file's `input`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only run these generators (by id, e.g. `node-client`); default is all configured
        #[arg(short, long)]
        only: Vec<String>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the parsed IR of an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a starter `.urmzd.oag.yaml` in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, clap::ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, only } => cmd_generate(input, only),
        Commands::Validate { input } => cmd_validate(input),
        Commands::Inspect { input, format } => cmd_inspect(input, format),
        Commands::Init { force } => cmd_init(force),
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oag", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OagConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_spec(path: &PathBuf, cfg: &OagConfig) -> Result<IrSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    let options = TransformOptions {
        naming_strategy: cfg.naming.strategy,
        aliases: cfg.naming.aliases.clone(),
    };

    let ir = transform::transform_with_options(&parsed, &options)?;
    Ok(ir)
}

fn generator_for(id: GeneratorId) -> Box<dyn CodeGenerator> {
    match id {
        GeneratorId::NodeClient => Box::new(NodeClientGenerator),
        GeneratorId::ReactSwrClient => Box::new(ReactSwrClientGenerator),
    }
}

fn cmd_generate(input: Option<PathBuf>, only: Vec<String>) -> Result<()> {
    let cfg = try_load_config()?.with_context(|| {
        format!(
            "no {} found in the current directory; run `oag init` first",
            CONFIG_FILE_NAME
        )
    })?;

    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let ir = load_spec(&input, &cfg)?;

    if cfg.generators.is_empty() {
        eprintln!("no generators configured in {}; nothing to do", CONFIG_FILE_NAME);
        return Ok(());
    }

    for (id, gen_config) in &cfg.generators {
        if !only.is_empty() && !only.iter().any(|o| o == id.as_str()) {
            continue;
        }
        run_generator(*id, &ir, gen_config)?;
    }

    Ok(())
}

fn run_generator(id: GeneratorId, ir: &IrSpec, config: &GeneratorConfig) -> Result<()> {
    let output = PathBuf::from(&config.output);
    fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let generator = generator_for(id);
    let files = generator.generate(ir, config).map_err(|e| anyhow::anyhow!(e))?;

    let mut written = 0usize;
    for file in &files {
        write_generated_file(&output, file)?;
        written += 1;
    }

    eprintln!("[{}] generated {} files in {}", id, written, output.display());

    if config.format_code {
        run_formatter(&output);
    }

    Ok(())
}

/// Write a generated file, honoring the `index.ts` "never overwrite" rule: an
/// existing `index.ts` is the user's customization point and is left alone on
/// regeneration.
fn write_generated_file(output: &std::path::Path, file: &GeneratedFile) -> Result<()> {
    let path = output.join(&file.path);
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if file_name == "index.ts" && path.exists() {
        eprintln!("  skipped {} (already exists)", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    fs::write(&path, &file.content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

/// Best-effort invocation of an external formatter over freshly written
/// output. Never fails the generation run: a missing binary or a non-zero
/// exit is logged as a warning and otherwise ignored.
fn run_formatter(output: &std::path::Path) {
    for (bin, args) in [("biome", &["format", "--write", "."][..]), ("prettier", &["--write", "."][..])] {
        match Command::new(bin).args(args).current_dir(output).output() {
            Ok(result) if result.status.success() => {
                eprintln!("  formatted output with {bin}");
                return;
            }
            Ok(result) => {
                log::warn!(
                    "{bin} exited with {}: {}",
                    result.status,
                    String::from_utf8_lossy(&result.stderr)
                );
            }
            Err(_) => continue,
        }
    }
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let content = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    if let Some(ref components) = parsed.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    // Also validate that it transforms to IR successfully.
    let ir = transform::transform(&parsed)?;
    eprintln!("  Operations: {}", ir.operations.len());
    eprintln!("  IR Schemas: {}", ir.schemas.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = load_spec(&input, &cfg)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = ir
        .schemas
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name().pascal_case,
                "kind": match s {
                    oag_core::ir::IrSchema::Object(_) => "object",
                    oag_core::ir::IrSchema::Enum(_) => "enum",
                    oag_core::ir::IrSchema::Alias(_) => "alias",
                    oag_core::ir::IrSchema::Union(_) => "union",
                },
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            let return_kind = match &op.return_type {
                oag_core::ir::IrReturnType::Standard(_) => "standard",
                oag_core::ir::IrReturnType::Sse(_) => "sse",
                oag_core::ir::IrReturnType::Void => "void",
            };
            serde_json::json!({
                "name": op.name.camel_case,
                "method": op.method.as_str(),
                "path": op.path,
                "return_kind": return_kind,
                "tags": op.tags,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "schemas": schemas,
        "operations": operations,
        "modules": ir.modules.iter().map(|m| &m.name.original).collect::<Vec<_>>(),
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_ts_is_preserved_on_regeneration() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.ts"), "// user customizations\n").unwrap();

        let file = GeneratedFile {
            path: "index.ts".to_string(),
            content: "// regenerated\n".to_string(),
        };
        write_generated_file(dir.path(), &file).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("index.ts")).unwrap();
        assert_eq!(on_disk, "// user customizations\n");
    }

    #[test]
    fn other_files_are_overwritten_on_regeneration() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("types.ts"), "// stale\n").unwrap();

        let file = GeneratedFile {
            path: "types.ts".to_string(),
            content: "// fresh\n".to_string(),
        };
        write_generated_file(dir.path(), &file).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("types.ts")).unwrap();
        assert_eq!(on_disk, "// fresh\n");
    }

    #[test]
    fn writes_into_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            path: "services/pets.ts".to_string(),
            content: "// pets service\n".to_string(),
        };
        write_generated_file(dir.path(), &file).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("services/pets.ts")).unwrap();
        assert_eq!(on_disk, "// pets service\n");
    }
}

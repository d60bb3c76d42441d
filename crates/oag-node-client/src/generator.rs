use oag_core::config::{GeneratorConfig, GeneratorId, OutputLayout, SplitBy, ToolSetting};
use oag_core::ir::IrSpec;
use oag_core::transform::{filter_tags, gc_unused_schemas};
use oag_core::{CodeGenerator, GeneratedFile, GeneratorError, apply_exclude_patterns};

use crate::emitters;
use crate::emitters::scaffold::{NodeScaffoldConfig, ScaffoldOptions};
use crate::emitters::source_path;

/// TypeScript/Node code generator.
pub struct NodeClientGenerator;

impl NodeClientGenerator {
    /// Build scaffold options from a GeneratorConfig.
    pub fn build_scaffold_options(
        ir: &IrSpec,
        config: &GeneratorConfig,
        react: bool,
    ) -> Option<ScaffoldOptions> {
        let raw = config.scaffold.as_ref()?;
        let scaffold: NodeScaffoldConfig = serde_json::from_value(raw.clone()).ok()?;
        Some(ScaffoldOptions {
            name: ir.info.title.clone(),
            package_name: scaffold.package_name,
            repository: scaffold.repository,
            formatter: ToolSetting::resolve(scaffold.formatter.as_ref(), "biome")
                .map(String::from),
            test_runner: ToolSetting::resolve(scaffold.test_runner.as_ref(), "vitest")
                .map(String::from),
            bundler: ToolSetting::resolve(scaffold.bundler.as_ref(), "tsdown")
                .map(String::from),
            react,
            validation: config.emit_validation,
            extra_dependencies: config.dependencies.clone().into_iter().collect(),
            extra_dev_dependencies: config.dev_dependencies.clone().into_iter().collect(),
        })
    }
}

impl CodeGenerator for NodeClientGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::NodeClient
    }

    fn generate(
        &self,
        ir: &IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        // Restrict this target to its included/excluded tags, then drop any
        // schema no longer reachable from a surviving operation. Each target
        // gets its own filtered+GC'd IR; the IR passed in stays untouched for
        // any other target run against the same spec.
        let filtered = filter_tags(ir, &config.include_tags, &config.exclude_tags)?;
        let ir = &gc_unused_schemas(&filtered);

        let no_jsdoc = config.no_jsdoc.unwrap_or(false);
        let scaffold_options = Self::build_scaffold_options(ir, config, false);

        let src_files = match config.layout {
            OutputLayout::Bundled => {
                let content = emitters::bundled::emit_bundled(
                    ir,
                    no_jsdoc,
                    &config.predefined_types,
                    config.emit_validation,
                );
                vec![GeneratedFile {
                    path: "index.ts".to_string(),
                    content,
                }]
            }
            OutputLayout::Modular => {
                let mut files = vec![
                    GeneratedFile {
                        path: "types.ts".to_string(),
                        content: emitters::types::emit_types(ir, &config.predefined_types),
                    },
                    GeneratedFile {
                        path: "runtime.ts".to_string(),
                        content: emitters::runtime::emit_runtime(),
                    },
                    GeneratedFile {
                        path: "client.ts".to_string(),
                        content: emitters::client::emit_client(ir, no_jsdoc, &config.predefined_types),
                    },
                ];
                if config.emit_validation {
                    files.push(GeneratedFile {
                        path: "schema.validation.ts".to_string(),
                        content: emitters::validation::emit_validation(ir, &config.predefined_types),
                    });
                }
                files.push(GeneratedFile {
                    path: "index.ts".to_string(),
                    content: emitters::index::emit_index(),
                });
                files
            }
            OutputLayout::Split => {
                let split_by = config.split_by.unwrap_or(SplitBy::Tag);
                let mut files =
                    emitters::split::emit_split(ir, no_jsdoc, split_by, &config.predefined_types);
                if config.emit_validation {
                    files.push(GeneratedFile {
                        path: "schema.validation.ts".to_string(),
                        content: emitters::validation::emit_validation(ir, &config.predefined_types),
                    });
                }
                files
            }
        };

        let mut src_files = src_files;
        if scaffold_options
            .as_ref()
            .is_some_and(|s| s.test_runner.is_some())
        {
            src_files.push(GeneratedFile {
                path: "client.test.ts".to_string(),
                content: emitters::tests::emit_client_tests(ir),
            });
        }

        // Source files live under the configured source_dir; scaffold/project
        // metadata (package.json, tsconfig.json, ...) sits at the output root.
        let mut files: Vec<GeneratedFile> = src_files
            .into_iter()
            .map(|f| GeneratedFile {
                path: source_path(&config.source_dir, &f.path),
                content: f.content,
            })
            .collect();

        if let Some(ref scaffold) = scaffold_options {
            files.extend(emitters::scaffold::emit_scaffold(scaffold));
        }

        Ok(apply_exclude_patterns(files, &config.exclude))
    }
}

use oag_core::config::{GeneratorConfig, GeneratorId};
use oag_core::ir::IrSpec;
use oag_core::transform::{filter_tags, gc_unused_schemas};
use oag_core::{CodeGenerator, GeneratedFile, GeneratorError, apply_exclude_patterns};
use oag_node_client::NodeClientGenerator;
use oag_node_client::emitters::source_path;

use crate::emitters;

/// React/SWR code generator. Produces the TypeScript client files plus React hooks.
pub struct ReactSwrClientGenerator;

impl CodeGenerator for ReactSwrClientGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::ReactSwrClient
    }

    fn generate(
        &self,
        ir: &IrSpec,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let filtered = filter_tags(ir, &config.include_tags, &config.exclude_tags)?;
        let ir = &gc_unused_schemas(&filtered);

        let scaffold_options = NodeClientGenerator::build_scaffold_options(ir, config, true);

        // Generate base TypeScript client files via the node-client generator
        // We manually produce the files to inject react scaffold options
        let no_jsdoc = config.no_jsdoc.unwrap_or(false);
        let mut src_files = vec![
            GeneratedFile {
                path: "types.ts".to_string(),
                content: oag_node_client::emitters::types::emit_types(ir, &config.predefined_types),
            },
            GeneratedFile {
                path: "runtime.ts".to_string(),
                content: oag_node_client::emitters::runtime::emit_runtime(),
            },
            GeneratedFile {
                path: "client.ts".to_string(),
                content: oag_node_client::emitters::client::emit_client(
                    ir,
                    no_jsdoc,
                    &config.predefined_types,
                ),
            },
        ];

        if scaffold_options
            .as_ref()
            .is_some_and(|s| s.test_runner.is_some())
        {
            src_files.push(GeneratedFile {
                path: "client.test.ts".to_string(),
                content: oag_node_client::emitters::tests::emit_client_tests(ir),
            });
            src_files.push(GeneratedFile {
                path: "hooks.test.ts".to_string(),
                content: emitters::tests::emit_hooks_tests(ir),
            });
        }

        // React-specific files
        src_files.push(GeneratedFile {
            path: "hooks.ts".to_string(),
            content: emitters::hooks::emit_hooks(ir, &config.predefined_types),
        });

        src_files.push(GeneratedFile {
            path: "provider.ts".to_string(),
            content: emitters::provider::emit_provider(),
        });

        // index.ts re-exports the client, hooks, and provider.
        src_files.push(GeneratedFile {
            path: "index.ts".to_string(),
            content: emitters::index::emit_index(),
        });

        let mut files: Vec<GeneratedFile> = src_files
            .into_iter()
            .map(|f| GeneratedFile {
                path: source_path(&config.source_dir, &f.path),
                content: f.content,
            })
            .collect();

        if let Some(ref scaffold) = scaffold_options {
            files.extend(oag_node_client::emitters::scaffold::emit_scaffold(scaffold));
        }

        Ok(apply_exclude_patterns(files, &config.exclude))
    }
}

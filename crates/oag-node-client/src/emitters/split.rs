use oag_core::GeneratedFile;
use oag_core::config::{PredefinedType, SplitBy};
use oag_core::ir::grouping::{OperationGroup, group_operations};
use oag_core::ir::IrSpec;

use super::{client, index, runtime, types};

/// Emit a split layout: a shared `types.ts`/`runtime.ts`, one service file per
/// group under `services/`, a `client.ts` façade composing them, and
/// `index.ts`.
pub fn emit_split(
    ir: &IrSpec,
    no_jsdoc: bool,
    split_by: SplitBy,
    predefined_types: &[PredefinedType],
) -> Vec<GeneratedFile> {
    let groups = group_operations(ir, split_by);

    let mut files = vec![
        GeneratedFile {
            path: "types.ts".to_string(),
            content: types::emit_types(ir, predefined_types),
        },
        GeneratedFile {
            path: "runtime.ts".to_string(),
            content: runtime::emit_runtime(),
        },
    ];

    let mut facade_groups: Vec<(String, String, String)> = Vec::new();

    for group in &groups {
        let sub_ir = filter_ir_to_group(ir, group);
        let class_name = format!("{}Service", group.name.pascal_case);
        let file_stem = group.name.snake_case.clone();
        files.push(GeneratedFile {
            path: format!("services/{}.ts", file_stem),
            content: client::emit_client_named(&sub_ir, no_jsdoc, &class_name, predefined_types),
        });
        facade_groups.push((group.name.camel_case.clone(), class_name, file_stem));
    }

    files.push(GeneratedFile {
        path: "client.ts".to_string(),
        content: client::emit_facade(&facade_groups),
    });

    files.push(GeneratedFile {
        path: "index.ts".to_string(),
        content: index::emit_index(),
    });

    files
}

/// Build a sub-`IrSpec` containing only the operations in `group`. Schemas,
/// info, servers, and security schemes are kept in full since `types.ts` is
/// shared across every service file.
fn filter_ir_to_group(ir: &IrSpec, group: &OperationGroup) -> IrSpec {
    let operations = group
        .operation_indices
        .iter()
        .map(|&i| ir.operations[i].clone())
        .collect();

    IrSpec {
        info: ir.info.clone(),
        servers: ir.servers.clone(),
        schemas: ir.schemas.clone(),
        operations,
        modules: ir.modules.clone(),
        security_schemes: ir.security_schemes.clone(),
    }
}

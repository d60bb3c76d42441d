use oag_core::config::PredefinedType;
use oag_core::ir::IrSpec;

use super::{client, runtime, types};

/// Emit a single `index.ts` containing everything a modular generation would
/// split across `types.ts`, `runtime.ts`, and `client.ts`. Each section keeps
/// its own content verbatim except for the `import ... from "./..."` lines
/// that would otherwise point at files that no longer exist in bundled mode.
pub fn emit_bundled(ir: &IrSpec, no_jsdoc: bool, predefined_types: &[PredefinedType]) -> String {
    let types_section = strip_local_imports(&types::emit_types(ir, predefined_types));
    let runtime_section = strip_local_imports(&runtime::emit_runtime());
    let client_section = strip_local_imports(&client::emit_client(ir, no_jsdoc, predefined_types));

    format!(
        "{}\n\n// ---- runtime.ts ----\n\n{}\n\n// ---- client.ts ----\n\n{}\n",
        types_section.trim_end(),
        runtime_section.trim(),
        client_section.trim()
    )
}

/// Drop any `import ... from "./local-module";` line — bundled output has no
/// local modules to import from, everything lives in the one file.
fn strip_local_imports(source: &str) -> String {
    source
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !(trimmed.starts_with("import ") && trimmed.contains("from \"./"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_relative_imports_only() {
        let src = "import { Foo } from \"./types\";\nimport { z } from \"zod\";\nexport const x = 1;";
        let out = strip_local_imports(src);
        assert!(!out.contains("./types"));
        assert!(out.contains("from \"zod\""));
        assert!(out.contains("export const x = 1;"));
    }
}

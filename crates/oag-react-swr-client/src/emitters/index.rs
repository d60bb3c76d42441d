/// Emit `index.ts` — the package's public re-exports (client, hooks, provider).
///
/// Like the node-client emitter of the same name, this file is only ever
/// written the first time: the CLI layer skips it on regeneration if it
/// already exists so user customizations survive.
pub fn emit_index() -> String {
    include_str!("../../templates/index.ts.j2").to_string()
}

/// Emit `index.ts` — the package's public re-exports.
///
/// Per the emitter contract, this file is only ever written the first time:
/// callers (the CLI layer) must skip it on regeneration if it already exists
/// on disk so user customizations survive.
pub fn emit_index() -> String {
    include_str!("../../templates/index.ts.j2").to_string()
}

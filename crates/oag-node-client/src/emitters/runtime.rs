/// Emit `runtime.ts` — the fetch-based request runtime every generated
/// client depends on: URL/body building, retry, lifecycle hooks, pluggable
/// auth strategies, and the SSE/NDJSON/chunked stream parsers. Inlined
/// (no external dependencies) so the generated package has zero runtime deps
/// beyond what the target config declares.
pub fn emit_runtime() -> String {
    include_str!("../../templates/runtime.ts.j2").to_string()
}

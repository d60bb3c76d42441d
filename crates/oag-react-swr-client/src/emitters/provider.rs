/// Emit `provider.ts` — the React context that carries a configured client
/// instance down to every generated hook.
///
/// Static: nothing in the IR changes its shape, only `hooks.ts`/`client.ts`
/// vary per spec.
pub fn emit_provider() -> String {
    include_str!("../../templates/provider.ts.j2").to_string()
}

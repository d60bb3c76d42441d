use std::collections::{HashMap, HashSet};

use minijinja::{Environment, context};
use oag_core::config::PredefinedType;
use oag_core::ir::{IrSchema, IrSpec, IrType};

use crate::type_mapper::ir_type_to_zod;

/// Emit `schema.validation.ts` — `zod` runtime schemas mirroring `types.ts`,
/// one `const XSchema` per declared model. Schemas are emitted in dependency
/// order so a definition never references a `const` before it's assigned;
/// when the dependency graph has a cycle, every local ref in the file falls
/// back to `z.lazy(...)` so order stops mattering.
pub fn emit_validation(ir: &IrSpec, predefined_types: &[PredefinedType]) -> String {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template(
        "schema.validation.ts.j2",
        include_str!("../../templates/schema.validation.ts.j2"),
    )
    .expect("template should be valid");
    let tmpl = env.get_template("schema.validation.ts.j2").unwrap();

    let predefined_names: HashSet<&str> = predefined_types
        .iter()
        .map(|p| p.type_name.as_str())
        .collect();

    let local_schemas: HashSet<String> = ir
        .schemas
        .iter()
        .map(|s| s.name().pascal_case.clone())
        .filter(|name| !predefined_names.contains(name.as_str()))
        .collect();

    let mut ordered = topological_order(ir, &local_schemas);
    let has_cycle = ordered.len() != local_schemas.len();

    if has_cycle {
        // Cycle participants never become "ready" for the topological sort;
        // append them (alphabetically, for determinism) so every local
        // schema is still emitted, just as `z.lazy(...)` instead of an
        // ordering guarantee.
        let emitted: HashSet<&str> = ordered.iter().map(|s| s.as_str()).collect();
        let mut remainder: Vec<String> = local_schemas
            .iter()
            .filter(|name| !emitted.contains(name.as_str()))
            .cloned()
            .collect();
        remainder.sort();
        ordered.extend(remainder);
    }

    let schemas: Vec<minijinja::Value> = ordered
        .iter()
        .filter_map(|name| ir.schemas.iter().find(|s| &s.name().pascal_case == name))
        .map(|s| schema_to_ctx(s, &local_schemas, has_cycle))
        .collect();

    tmpl.render(context! { schemas => schemas })
        .expect("render should succeed")
}

fn schema_to_ctx(schema: &IrSchema, local_schemas: &HashSet<String>, lazy: bool) -> minijinja::Value {
    match schema {
        IrSchema::Object(obj) => {
            let fields: Vec<minijinja::Value> = obj
                .fields
                .iter()
                .map(|f| {
                    context! {
                        name => f.name.camel_case.clone(),
                        zod_type => ir_type_to_zod(&f.field_type, local_schemas, lazy),
                        required => f.required,
                    }
                })
                .collect();
            let additional = obj
                .additional_properties
                .as_ref()
                .map(|t| ir_type_to_zod(t, local_schemas, lazy));
            context! {
                kind => "object",
                name => obj.name.pascal_case.clone(),
                fields => fields,
                additional_properties => additional,
            }
        }
        IrSchema::Enum(e) => {
            let variants: Vec<String> = e.variants.iter().map(|v| format!("\"{v}\"")).collect();
            context! {
                kind => "enum",
                name => e.name.pascal_case.clone(),
                variants => variants,
            }
        }
        IrSchema::Alias(a) => {
            context! {
                kind => "alias",
                name => a.name.pascal_case.clone(),
                zod_type => ir_type_to_zod(&a.target, local_schemas, lazy),
            }
        }
        IrSchema::Union(u) => {
            let variants: Vec<String> = u
                .variants
                .iter()
                .map(|v| ir_type_to_zod(v, local_schemas, lazy))
                .collect();
            context! {
                kind => "union",
                name => u.name.pascal_case.clone(),
                variants => variants,
            }
        }
    }
}

/// Kahn's-algorithm topological sort over the "references" edge: schema A
/// depends on schema B if A's definition directly names `Ref(B)` (through
/// arrays/maps/unions, but not through another schema's own body). Returns
/// a prefix of `local_schemas` in dependency order; if the graph has a
/// cycle, the nodes still in the cycle are omitted. The caller appends
/// those remaining schemas itself and renders every local ref as
/// `z.lazy(...)` so the cycle participants still get emitted.
fn topological_order(ir: &IrSpec, local_schemas: &HashSet<String>) -> Vec<String> {
    let mut deps: HashMap<&str, HashSet<String>> = HashMap::new();
    for schema in &ir.schemas {
        let name = schema.name().pascal_case.as_str();
        if !local_schemas.contains(name) {
            continue;
        }
        let mut refs = HashSet::new();
        match schema {
            IrSchema::Object(obj) => {
                for f in &obj.fields {
                    collect_direct_refs(&f.field_type, &mut refs);
                }
                if let Some(ref t) = obj.additional_properties {
                    collect_direct_refs(t, &mut refs);
                }
            }
            IrSchema::Alias(a) => collect_direct_refs(&a.target, &mut refs),
            IrSchema::Union(u) => {
                for v in &u.variants {
                    collect_direct_refs(v, &mut refs);
                }
            }
            IrSchema::Enum(_) => {}
        }
        refs.retain(|r| local_schemas.contains(r) && r != name);
        deps.insert(name, refs);
    }

    // A node is ready once every schema it depends on has already been emitted.
    let mut remaining: HashMap<&str, HashSet<String>> = deps.clone();
    let mut ordered = Vec::new();
    let mut emitted: HashSet<String> = HashSet::new();

    loop {
        let mut progressed = false;
        let mut ready: Vec<&str> = remaining
            .iter()
            .filter(|(_, deps)| deps.iter().all(|d| emitted.contains(d)))
            .map(|(name, _)| *name)
            .collect();
        ready.sort();
        for name in ready.drain(..) {
            remaining.remove(name);
            emitted.insert(name.to_string());
            ordered.push(name.to_string());
            progressed = true;
        }
        if !progressed || remaining.is_empty() {
            break;
        }
    }

    ordered
}

fn collect_direct_refs(ir_type: &IrType, refs: &mut HashSet<String>) {
    match ir_type {
        IrType::Ref(name) => {
            refs.insert(name.clone());
        }
        IrType::Array(inner) | IrType::Map(inner) => collect_direct_refs(inner, refs),
        IrType::Union(variants) => {
            for v in variants {
                collect_direct_refs(v, refs);
            }
        }
        IrType::Nullable(inner) => collect_direct_refs(inner, refs),
        _ => {}
    }
}

use std::collections::HashSet;

use crate::ir::{IrRequestBody, IrReturnType, IrSchema, IrSpec, IrType};

/// Remove schemas that are unreachable from any surviving operation.
///
/// Reachability is a transitive walk starting at each operation's parameters,
/// request body and response type, following `Ref`, `Array`, `Map`, `Union`
/// and inline `Object` types, then continuing through each reached named
/// schema's own fields/variants/target. The walk tracks visited names so
/// cyclic schemas (`Node` containing `Vec<Node>`) terminate.
///
/// Call this per-target, after [`super::filter::filter_tags`] has pruned
/// operations — a model only referenced by an excluded operation should not
/// ship in that target's output.
pub fn gc_unused_schemas(ir: &IrSpec) -> IrSpec {
    let by_name: std::collections::HashMap<&str, &IrSchema> =
        ir.schemas.iter().map(|s| (s.name().pascal_case.as_str(), s)).collect();

    let mut reachable: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();

    for op in &ir.operations {
        for p in &op.parameters {
            collect_refs(&p.param_type, &mut stack);
        }
        if let Some(IrRequestBody { body_type, .. }) = &op.request_body {
            collect_refs(body_type, &mut stack);
        }
        match &op.return_type {
            IrReturnType::Standard(r) => collect_refs(&r.response_type, &mut stack),
            IrReturnType::Sse(sse) => {
                collect_refs(&sse.event_type, &mut stack);
                for v in &sse.variants {
                    collect_refs(v, &mut stack);
                }
                if let Some(r) = &sse.json_response {
                    collect_refs(&r.response_type, &mut stack);
                }
            }
            IrReturnType::Void => {}
        }
    }

    while let Some(name) = stack.pop() {
        if !reachable.insert(name.clone()) {
            continue;
        }
        let Some(schema) = by_name.get(name.as_str()) else {
            continue;
        };
        match schema {
            IrSchema::Object(o) => {
                for f in &o.fields {
                    collect_refs(&f.field_type, &mut stack);
                }
                if let Some(ap) = &o.additional_properties {
                    collect_refs(ap, &mut stack);
                }
            }
            IrSchema::Alias(a) => collect_refs(&a.target, &mut stack),
            IrSchema::Union(u) => {
                for v in &u.variants {
                    collect_refs(v, &mut stack);
                }
            }
            IrSchema::Enum(_) => {}
        }
    }

    let schemas = ir
        .schemas
        .iter()
        .filter(|s| reachable.contains(&s.name().pascal_case))
        .cloned()
        .collect();

    IrSpec {
        info: ir.info.clone(),
        servers: ir.servers.clone(),
        schemas,
        operations: ir.operations.clone(),
        modules: ir.modules.clone(),
        security_schemes: ir.security_schemes.clone(),
    }
}

fn collect_refs(ty: &IrType, stack: &mut Vec<String>) {
    match ty {
        IrType::Ref(name) => stack.push(name.clone()),
        IrType::Array(inner) | IrType::Map(inner) => collect_refs(inner, stack),
        IrType::Union(variants) => {
            for v in variants {
                collect_refs(v, stack);
            }
        }
        IrType::Object(fields) => {
            for (_, ty, _) in fields {
                collect_refs(ty, stack);
            }
        }
        IrType::Nullable(inner) => collect_refs(inner, stack),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        HttpMethod, IrAliasSchema, IrInfo, IrObjectSchema, IrOperation, IrResponse, NormalizedName,
    };

    fn name(s: &str) -> NormalizedName {
        NormalizedName {
            original: s.to_string(),
            pascal_case: s.to_string(),
            camel_case: s.to_string(),
            snake_case: s.to_string(),
            screaming_snake: s.to_string(),
        }
    }

    #[test]
    fn drops_unreferenced_schema() {
        let ir = IrSpec {
            info: IrInfo {
                title: "t".into(),
                description: None,
                version: "1".into(),
            },
            servers: vec![],
            schemas: vec![
                IrSchema::Object(IrObjectSchema {
                    name: name("Used"),
                    description: None,
                    fields: vec![],
                    additional_properties: None,
                }),
                IrSchema::Alias(IrAliasSchema {
                    name: name("Unused"),
                    description: None,
                    target: IrType::String,
                }),
            ],
            operations: vec![IrOperation {
                name: name("getUsed"),
                method: HttpMethod::Get,
                path: "/used".into(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                return_type: IrReturnType::Standard(IrResponse {
                    response_type: IrType::Ref("Used".into()),
                    description: None,
                }),
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        let gced = gc_unused_schemas(&ir);
        assert_eq!(gced.schemas.len(), 1);
        assert_eq!(gced.schemas[0].name().original, "Used");
    }

    #[test]
    fn keeps_cyclic_schema_reachable_from_itself() {
        let ir = IrSpec {
            info: IrInfo {
                title: "t".into(),
                description: None,
                version: "1".into(),
            },
            servers: vec![],
            schemas: vec![IrSchema::Object(IrObjectSchema {
                name: name("Node"),
                description: None,
                fields: vec![crate::ir::IrField {
                    name: name("children"),
                    original_name: "children".into(),
                    field_type: IrType::Array(Box::new(IrType::Ref("Node".into()))),
                    required: false,
                    description: None,
                    read_only: false,
                    write_only: false,
                }],
                additional_properties: None,
            })],
            operations: vec![IrOperation {
                name: name("getNode"),
                method: HttpMethod::Get,
                path: "/node".into(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                return_type: IrReturnType::Standard(IrResponse {
                    response_type: IrType::Ref("Node".into()),
                    description: None,
                }),
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        let gced = gc_unused_schemas(&ir);
        assert_eq!(gced.schemas.len(), 1);
    }
}

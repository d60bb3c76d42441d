use std::collections::HashSet;

use heck::ToPascalCase;

use crate::ir::{IrField, IrObjectSchema, IrSchema, IrSpec, IrType};

use super::name_normalizer::normalize_name;

/// Promote inline `IrType::Object(fields)` with non-empty fields into named
/// `IrSchema::Object` entries, replacing them with `IrType::Ref`.
///
/// This benefits all generators: Python gets proper Pydantic models instead of
/// `dict[str, Any]`, and TypeScript gets named interfaces instead of inline types.
pub fn promote_inline_objects(ir: &mut IrSpec) {
    let mut used_names: HashSet<String> = ir
        .schemas
        .iter()
        .map(|s| s.name().pascal_case.clone())
        .collect();

    // Snapshot of the component schema table as it existed before promotion,
    // used for the structural-equality identity check in `promote_type`
    // (§4.3c: an inline object that matches a declared component is a ref to
    // that component, not a fresh synthetic name).
    let component_schemas = ir.schemas.clone();

    let mut new_schemas: Vec<IrSchema> = Vec::new();

    // Phase 1: Walk existing schemas and promote inline objects in their fields
    for schema in &mut ir.schemas {
        if let IrSchema::Object(obj) = schema {
            let context = obj.name.pascal_case.clone();
            for field in &mut obj.fields {
                let field_context = format!("{}{}", context, field.name.pascal_case);
                promote_type(
                    &field_context,
                    &mut field.field_type,
                    &mut new_schemas,
                    &mut used_names,
                    &component_schemas,
                );
            }
        }
    }

    // Phase 2: Walk operations and promote inline objects in return types, request bodies, and parameters
    for op in &mut ir.operations {
        let tag_pascal = op
            .tags
            .first()
            .map(|t| t.to_pascal_case())
            .unwrap_or_default();
        let op_pascal = format!("{}{}", tag_pascal, op.name.pascal_case);

        // Return type
        match &mut op.return_type {
            crate::ir::IrReturnType::Standard(resp) => {
                let ctx = format!("{}Response", op_pascal);
                promote_type(
                    &ctx,
                    &mut resp.response_type,
                    &mut new_schemas,
                    &mut used_names,
                    &component_schemas,
                );
            }
            crate::ir::IrReturnType::Sse(sse) => {
                let ctx = format!("{}Event", op_pascal);
                promote_type(
                    &ctx,
                    &mut sse.event_type,
                    &mut new_schemas,
                    &mut used_names,
                    &component_schemas,
                );
                for variant in &mut sse.variants {
                    promote_type(&ctx, variant, &mut new_schemas, &mut used_names, &component_schemas);
                }
                if let Some(ref mut json_resp) = sse.json_response {
                    let json_ctx = format!("{}Response", op_pascal);
                    promote_type(
                        &json_ctx,
                        &mut json_resp.response_type,
                        &mut new_schemas,
                        &mut used_names,
                        &component_schemas,
                    );
                }
            }
            crate::ir::IrReturnType::Void => {}
        }

        // Request body
        if let Some(ref mut body) = op.request_body {
            let ctx = format!("{}Body", op_pascal);
            promote_type(
                &ctx,
                &mut body.body_type,
                &mut new_schemas,
                &mut used_names,
                &component_schemas,
            );
        }

        // Parameters
        for param in &mut op.parameters {
            let ctx = format!("{}{}", op_pascal, param.name.pascal_case);
            promote_type(
                &ctx,
                &mut param.param_type,
                &mut new_schemas,
                &mut used_names,
                &component_schemas,
            );
        }
    }

    ir.schemas.extend(new_schemas);
}

/// Recursively walk an `IrType`, promoting any `IrType::Object(fields)` with
/// non-empty fields into a named schema and replacing it with `IrType::Ref`.
fn promote_type(
    context_name: &str,
    ir_type: &mut IrType,
    new_schemas: &mut Vec<IrSchema>,
    used_names: &mut HashSet<String>,
    component_schemas: &[IrSchema],
) {
    match ir_type {
        IrType::Object(fields) if !fields.is_empty() => {
            // First, check whether this inline shape is really a component
            // schema that a bundler (or the Loader's dereference fallback)
            // flattened from a `$ref` into an inline object. If so, reuse
            // that component's name instead of minting a new one.
            if let Some(existing_name) = find_structural_match(fields, component_schemas) {
                *ir_type = IrType::Ref(existing_name);
                return;
            }

            let name = unique_name(context_name, used_names);

            // Convert (String, IrType, bool) tuples to IrField
            let mut ir_fields: Vec<IrField> = fields
                .drain(..)
                .map(|(field_name, field_type, required)| IrField {
                    name: normalize_name(&field_name),
                    original_name: field_name,
                    field_type,
                    required,
                    description: None,
                    read_only: false,
                    write_only: false,
                })
                .collect();

            // Recurse into each field's type
            let schema_name = name.clone();
            for field in &mut ir_fields {
                let field_ctx = format!("{}{}", schema_name, field.name.pascal_case);
                promote_type(
                    &field_ctx,
                    &mut field.field_type,
                    new_schemas,
                    used_names,
                    component_schemas,
                );
            }

            new_schemas.push(IrSchema::Object(IrObjectSchema {
                name: normalize_name(&name),
                description: None,
                fields: ir_fields,
                additional_properties: None,
            }));

            *ir_type = IrType::Ref(name);
        }
        IrType::Array(inner) => {
            let item_ctx = format!("{}Item", context_name);
            promote_type(&item_ctx, inner, new_schemas, used_names, component_schemas);
        }
        IrType::Map(inner) => {
            let value_ctx = format!("{}Value", context_name);
            promote_type(&value_ctx, inner, new_schemas, used_names, component_schemas);
        }
        IrType::Union(variants) => {
            for (i, variant) in variants.iter_mut().enumerate() {
                let variant_ctx = format!("{}Variant{}", context_name, i + 1);
                promote_type(
                    &variant_ctx,
                    variant,
                    new_schemas,
                    used_names,
                    component_schemas,
                );
            }
        }
        IrType::Nullable(inner) => {
            promote_type(context_name, inner, new_schemas, used_names, component_schemas);
        }
        _ => {}
    }
}

/// Structural-equality predicate for the §4.3c identity check: "does this
/// inline schema really describe component X?" Objects, arrays, maps, and
/// refs compare recursively by shape; everything else (notably unions and
/// allOf-merged schemas) is compared by kind only — a deliberately
/// conservative approximation, since two differently-shaped `oneOf`s can
/// otherwise be falsely equated (see the open question in the design notes).
fn structurally_equal(a: &IrType, b: &IrType) -> bool {
    match (a, b) {
        (IrType::String, IrType::String)
        | (IrType::Number, IrType::Number)
        | (IrType::Integer, IrType::Integer)
        | (IrType::Boolean, IrType::Boolean)
        | (IrType::Null, IrType::Null)
        | (IrType::Any, IrType::Any)
        | (IrType::Void, IrType::Void)
        | (IrType::DateTime, IrType::DateTime)
        | (IrType::Binary, IrType::Binary) => true,
        (IrType::StringLiteral(x), IrType::StringLiteral(y)) => x == y,
        (IrType::Ref(x), IrType::Ref(y)) => x == y,
        (IrType::Array(x), IrType::Array(y)) => structurally_equal(x, y),
        (IrType::Map(x), IrType::Map(y)) => structurally_equal(x, y),
        (IrType::Object(x), IrType::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(name, ty, req)| {
                    y.iter()
                        .any(|(n2, ty2, req2)| n2 == name && req2 == req && structurally_equal(ty, ty2))
                })
        }
        (IrType::Union(x), IrType::Union(y)) => x.len() == y.len(),
        (IrType::Nullable(x), IrType::Nullable(y)) => structurally_equal(x, y),
        _ => false,
    }
}

/// Search the component schema table for an object whose field set matches
/// `fields` exactly (same names, required flags, and recursively-equal
/// types), returning that component's name if found.
fn find_structural_match(fields: &[(String, IrType, bool)], schemas: &[IrSchema]) -> Option<String> {
    schemas.iter().find_map(|s| {
        let IrSchema::Object(obj) = s else {
            return None;
        };
        if obj.fields.len() != fields.len() {
            return None;
        }
        let matches = fields.iter().all(|(name, ty, req)| {
            obj.fields
                .iter()
                .any(|f| &f.original_name == name && f.required == *req && structurally_equal(&f.field_type, ty))
        });
        matches.then(|| obj.name.pascal_case.clone())
    })
}

/// Generate a unique PascalCase name, appending numeric suffixes if needed.
fn unique_name(base: &str, used_names: &mut HashSet<String>) -> String {
    let pascal = base.to_pascal_case();
    if used_names.insert(pascal.clone()) {
        return pascal;
    }
    let mut i = 2;
    loop {
        let candidate = format!("{}{}", pascal, i);
        if used_names.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;

    fn make_spec_with_inline_object() -> IrSpec {
        IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![IrSchema::Object(IrObjectSchema {
                name: normalize_name("Pet"),
                description: None,
                fields: vec![IrField {
                    name: normalize_name("owner"),
                    original_name: "owner".to_string(),
                    field_type: IrType::Object(vec![
                        ("name".to_string(), IrType::String, true),
                        ("age".to_string(), IrType::Integer, false),
                    ]),
                    required: true,
                    description: None,
                    read_only: false,
                    write_only: false,
                }],
                additional_properties: None,
            })],
            operations: vec![],
            modules: vec![],
            security_schemes: vec![],
        }
    }

    #[test]
    fn promotes_inline_object_in_schema_field() {
        let mut ir = make_spec_with_inline_object();
        promote_inline_objects(&mut ir);

        // The Pet schema's owner field should now be a Ref
        let pet = match &ir.schemas[0] {
            IrSchema::Object(o) => o,
            _ => panic!("expected object"),
        };
        assert!(matches!(&pet.fields[0].field_type, IrType::Ref(name) if name == "PetOwner"));

        // A new schema PetOwner should exist
        assert_eq!(ir.schemas.len(), 2);
        let owner = match &ir.schemas[1] {
            IrSchema::Object(o) => o,
            _ => panic!("expected object"),
        };
        assert_eq!(owner.name.pascal_case, "PetOwner");
        assert_eq!(owner.fields.len(), 2);
        assert_eq!(owner.fields[0].original_name, "name");
        assert_eq!(owner.fields[1].original_name, "age");
    }

    #[test]
    fn promotes_inline_object_in_operation_return_type() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![],
            operations: vec![IrOperation {
                name: normalize_name("getPet"),
                method: HttpMethod::Get,
                path: "/pet".to_string(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                return_type: IrReturnType::Standard(IrResponse {
                    response_type: IrType::Object(vec![
                        ("id".to_string(), IrType::Integer, true),
                        ("name".to_string(), IrType::String, true),
                    ]),
                    description: None,
                }),
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        // Return type should be promoted to a Ref
        match &ir.operations[0].return_type {
            IrReturnType::Standard(resp) => {
                assert!(matches!(&resp.response_type, IrType::Ref(n) if n == "GetPetResponse"));
            }
            _ => panic!("expected standard return"),
        }
        assert_eq!(ir.schemas.len(), 1);
    }

    #[test]
    fn promotes_inline_object_with_tag_prefix() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![],
            operations: vec![IrOperation {
                name: normalize_name("doSomething"),
                method: HttpMethod::Get,
                path: "/something".to_string(),
                summary: None,
                description: None,
                tags: vec!["Custom".to_string()],
                parameters: vec![],
                request_body: None,
                return_type: IrReturnType::Standard(IrResponse {
                    response_type: IrType::Object(vec![("ok".to_string(), IrType::Boolean, true)]),
                    description: None,
                }),
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        match &ir.operations[0].return_type {
            IrReturnType::Standard(resp) => {
                assert!(matches!(&resp.response_type, IrType::Ref(n) if n == "CustomDoSomethingResponse"));
            }
            _ => panic!("expected standard return"),
        }
    }

    #[test]
    fn promotes_nested_array_items() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![IrSchema::Object(IrObjectSchema {
                name: normalize_name("Response"),
                description: None,
                fields: vec![IrField {
                    name: normalize_name("items"),
                    original_name: "items".to_string(),
                    field_type: IrType::Array(Box::new(IrType::Object(vec![(
                        "id".to_string(),
                        IrType::Integer,
                        true,
                    )]))),
                    required: true,
                    description: None,
                    read_only: false,
                    write_only: false,
                }],
                additional_properties: None,
            })],
            operations: vec![],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        let resp = match &ir.schemas[0] {
            IrSchema::Object(o) => o,
            _ => panic!("expected object"),
        };
        // Should be Array(Ref("ResponseItemsItem"))
        match &resp.fields[0].field_type {
            IrType::Array(inner) => {
                assert!(matches!(inner.as_ref(), IrType::Ref(n) if n == "ResponseItemsItem"));
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn does_not_promote_empty_objects() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![IrSchema::Object(IrObjectSchema {
                name: normalize_name("Config"),
                description: None,
                fields: vec![IrField {
                    name: normalize_name("metadata"),
                    original_name: "metadata".to_string(),
                    field_type: IrType::Object(vec![]),
                    required: false,
                    description: None,
                    read_only: false,
                    write_only: false,
                }],
                additional_properties: None,
            })],
            operations: vec![],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        // Empty objects should remain as IrType::Object([])
        let config = match &ir.schemas[0] {
            IrSchema::Object(o) => o,
            _ => panic!("expected object"),
        };
        assert!(matches!(&config.fields[0].field_type, IrType::Object(f) if f.is_empty()));
        assert_eq!(ir.schemas.len(), 1); // No new schemas added
    }

    #[test]
    fn deduplicates_names() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![
                // Existing schema named "PetOwner"
                IrSchema::Object(IrObjectSchema {
                    name: normalize_name("PetOwner"),
                    description: None,
                    fields: vec![],
                    additional_properties: None,
                }),
                // Pet schema with inline owner field that would normally be "PetOwner"
                IrSchema::Object(IrObjectSchema {
                    name: normalize_name("Pet"),
                    description: None,
                    fields: vec![IrField {
                        name: normalize_name("owner"),
                        original_name: "owner".to_string(),
                        field_type: IrType::Object(vec![(
                            "name".to_string(),
                            IrType::String,
                            true,
                        )]),
                        required: true,
                        description: None,
                        read_only: false,
                        write_only: false,
                    }],
                    additional_properties: None,
                }),
            ],
            operations: vec![],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        // Should get "PetOwner2" since "PetOwner" already exists
        let pet = match &ir.schemas[1] {
            IrSchema::Object(o) => o,
            _ => panic!("expected object"),
        };
        assert!(matches!(&pet.fields[0].field_type, IrType::Ref(n) if n == "PetOwner2"));
    }

    #[test]
    fn promotes_request_body_inline_object() {
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![],
            operations: vec![IrOperation {
                name: normalize_name("createPet"),
                method: HttpMethod::Post,
                path: "/pet".to_string(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: Some(IrRequestBody {
                    body_type: IrType::Object(vec![("name".to_string(), IrType::String, true)]),
                    required: true,
                    content_type: "application/json".to_string(),
                    description: None,
                    encoding: None,
                }),
                return_type: IrReturnType::Void,
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        match &ir.operations[0].request_body {
            Some(body) => {
                assert!(matches!(&body.body_type, IrType::Ref(n) if n == "CreatePetBody"));
            }
            None => panic!("expected request body"),
        }
        assert_eq!(ir.schemas.len(), 1);
    }

    #[test]
    fn reuses_component_name_for_structurally_identical_inline_response() {
        // Mirrors the case where a bundler has inlined what was really a
        // `$ref` to a component schema — the inline object here has the
        // exact same fields as the existing `User` component.
        let mut ir = IrSpec {
            info: IrInfo {
                title: "Test".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers: vec![],
            schemas: vec![IrSchema::Object(IrObjectSchema {
                name: normalize_name("User"),
                description: None,
                fields: vec![
                    IrField {
                        name: normalize_name("id"),
                        original_name: "id".to_string(),
                        field_type: IrType::Integer,
                        required: true,
                        description: None,
                        read_only: false,
                        write_only: false,
                    },
                    IrField {
                        name: normalize_name("name"),
                        original_name: "name".to_string(),
                        field_type: IrType::String,
                        required: true,
                        description: None,
                        read_only: false,
                        write_only: false,
                    },
                ],
                additional_properties: None,
            })],
            operations: vec![IrOperation {
                name: normalize_name("getUser"),
                method: HttpMethod::Get,
                path: "/user".to_string(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                return_type: IrReturnType::Standard(IrResponse {
                    response_type: IrType::Object(vec![
                        ("id".to_string(), IrType::Integer, true),
                        ("name".to_string(), IrType::String, true),
                    ]),
                    description: None,
                }),
                deprecated: false,
            }],
            modules: vec![],
            security_schemes: vec![],
        };

        promote_inline_objects(&mut ir);

        match &ir.operations[0].return_type {
            IrReturnType::Standard(resp) => {
                assert!(matches!(&resp.response_type, IrType::Ref(n) if n == "User"));
            }
            _ => panic!("expected standard return"),
        }
        // No synthetic `GetUserResponse` schema should have been minted.
        assert_eq!(ir.schemas.len(), 1);
    }
}

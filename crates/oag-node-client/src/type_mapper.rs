use oag_core::ir::IrType;

/// Map an `IrType` to its TypeScript type string representation.
pub fn ir_type_to_ts(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "string".to_string(),
        IrType::StringLiteral(s) => format!("\"{s}\""),
        IrType::Number => "number".to_string(),
        IrType::Integer => "number".to_string(),
        IrType::Boolean => "boolean".to_string(),
        IrType::Null => "null".to_string(),
        IrType::DateTime => "string".to_string(),
        IrType::Binary => "Blob".to_string(),
        IrType::Any => "unknown".to_string(),
        IrType::Void => "void".to_string(),
        IrType::Ref(name) => name.clone(),
        IrType::Array(inner) => {
            let inner_ts = ir_type_to_ts(inner);
            if inner_ts.contains('|') {
                format!("({inner_ts})[]")
            } else {
                format!("{inner_ts}[]")
            }
        }
        IrType::Map(value_type) => {
            let value_ts = ir_type_to_ts(value_type);
            format!("Record<string, {value_ts}>")
        }
        IrType::Object(fields) => {
            if fields.is_empty() {
                return "Record<string, unknown>".to_string();
            }
            let field_strs: Vec<String> = fields
                .iter()
                .map(|(name, ty, required)| {
                    let ts_type = ir_type_to_ts(ty);
                    if *required {
                        format!("{name}: {ts_type}")
                    } else {
                        format!("{name}?: {ts_type}")
                    }
                })
                .collect();
            format!("{{ {} }}", field_strs.join("; "))
        }
        IrType::Union(variants) => {
            let variant_strs: Vec<String> = variants.iter().map(ir_type_to_ts).collect();
            variant_strs.join(" | ")
        }
        IrType::Nullable(inner) => {
            let inner_ts = ir_type_to_ts(inner);
            format!("{inner_ts} | null")
        }
    }
}

/// Map an `IrType` to a `zod` schema expression.
///
/// `local_schemas` is the set of names that have a generated `XSchema` const
/// in `schema.validation.ts`; any other `Ref` is either a predefined type
/// (validated loosely via `z.custom<Name>()`, since its shape is owned by
/// another package) or unresolved (same fallback). When `lazy` is set, local
/// refs are wrapped in `z.lazy(() => ...)` so declaration order — and
/// reference cycles — never matter.
pub fn ir_type_to_zod(ir_type: &IrType, local_schemas: &std::collections::HashSet<String>, lazy: bool) -> String {
    match ir_type {
        IrType::String => "z.string()".to_string(),
        IrType::StringLiteral(s) => format!("z.literal(\"{s}\")"),
        IrType::Number => "z.number()".to_string(),
        IrType::Integer => "z.number().int()".to_string(),
        IrType::Boolean => "z.boolean()".to_string(),
        IrType::Null => "z.null()".to_string(),
        IrType::DateTime => "z.string().datetime({ offset: true })".to_string(),
        IrType::Binary => "z.instanceof(Blob)".to_string(),
        IrType::Any => "z.unknown()".to_string(),
        IrType::Void => "z.void()".to_string(),
        IrType::Ref(name) => {
            if local_schemas.contains(name) {
                let schema_ref = format!("{name}Schema");
                if lazy {
                    format!("z.lazy(() => {schema_ref})")
                } else {
                    schema_ref
                }
            } else {
                format!("z.custom<{name}>()")
            }
        }
        IrType::Array(inner) => {
            format!("z.array({})", ir_type_to_zod(inner, local_schemas, lazy))
        }
        IrType::Map(value_type) => {
            format!(
                "z.record(z.string(), {})",
                ir_type_to_zod(value_type, local_schemas, lazy)
            )
        }
        IrType::Object(fields) => {
            if fields.is_empty() {
                return "z.record(z.string(), z.unknown())".to_string();
            }
            let field_strs: Vec<String> = fields
                .iter()
                .map(|(name, ty, required)| {
                    let zod_type = ir_type_to_zod(ty, local_schemas, lazy);
                    if *required {
                        format!("{name}: {zod_type}")
                    } else {
                        format!("{name}: {zod_type}.optional()")
                    }
                })
                .collect();
            format!("z.object({{ {} }})", field_strs.join(", "))
        }
        IrType::Union(variants) => {
            let variant_strs: Vec<String> =
                variants.iter().map(|v| ir_type_to_zod(v, local_schemas, lazy)).collect();
            format!("z.union([{}])", variant_strs.join(", "))
        }
        IrType::Nullable(inner) => {
            format!("{}.nullable()", ir_type_to_zod(inner, local_schemas, lazy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        assert_eq!(ir_type_to_ts(&IrType::String), "string");
        assert_eq!(ir_type_to_ts(&IrType::Number), "number");
        assert_eq!(ir_type_to_ts(&IrType::Integer), "number");
        assert_eq!(ir_type_to_ts(&IrType::Boolean), "boolean");
        assert_eq!(ir_type_to_ts(&IrType::Null), "null");
        assert_eq!(ir_type_to_ts(&IrType::Any), "unknown");
        assert_eq!(ir_type_to_ts(&IrType::Void), "void");
    }

    #[test]
    fn test_array() {
        assert_eq!(
            ir_type_to_ts(&IrType::Array(Box::new(IrType::String))),
            "string[]"
        );
        assert_eq!(
            ir_type_to_ts(&IrType::Array(Box::new(IrType::Union(vec![
                IrType::String,
                IrType::Number,
            ])))),
            "(string | number)[]"
        );
    }

    #[test]
    fn test_map() {
        assert_eq!(
            ir_type_to_ts(&IrType::Map(Box::new(IrType::String))),
            "Record<string, string>"
        );
    }

    #[test]
    fn test_ref() {
        assert_eq!(ir_type_to_ts(&IrType::Ref("Pet".to_string())), "Pet");
    }

    #[test]
    fn test_union() {
        assert_eq!(
            ir_type_to_ts(&IrType::Union(vec![IrType::String, IrType::Number])),
            "string | number"
        );
    }

    #[test]
    fn test_zod_primitives() {
        let local = std::collections::HashSet::new();
        assert_eq!(ir_type_to_zod(&IrType::String, &local, false), "z.string()");
        assert_eq!(ir_type_to_zod(&IrType::Integer, &local, false), "z.number().int()");
        assert_eq!(
            ir_type_to_zod(&IrType::Array(Box::new(IrType::String)), &local, false),
            "z.array(z.string())"
        );
    }

    #[test]
    fn test_zod_local_ref_lazy_vs_direct() {
        let mut local = std::collections::HashSet::new();
        local.insert("Pet".to_string());
        assert_eq!(ir_type_to_zod(&IrType::Ref("Pet".to_string()), &local, false), "PetSchema");
        assert_eq!(
            ir_type_to_zod(&IrType::Ref("Pet".to_string()), &local, true),
            "z.lazy(() => PetSchema)"
        );
    }

    #[test]
    fn test_zod_predefined_ref_falls_back_to_custom() {
        let local = std::collections::HashSet::new();
        assert_eq!(
            ir_type_to_zod(&IrType::Ref("ResourceId".to_string()), &local, false),
            "z.custom<ResourceId>()"
        );
    }
}

use regex::Regex;

use crate::error::TransformError;
use crate::ir::IrSpec;

use super::spec_to_ir::group_into_modules;

/// Restrict an IR to operations whose tags match the include/exclude regex
/// patterns. Patterns are matched against each of an operation's tags (an
/// untagged operation is treated as tagged `misc`). Exclude wins over
/// include. Modules are rebuilt from the surviving operations.
///
/// An invalid regex in either list is a `ConfigError`-class failure: it
/// surfaces as a fatal `TransformError` rather than being silently skipped,
/// since a pattern that never matches anything would silently keep (or
/// drop) every operation instead of the ones the user actually meant.
pub fn filter_tags(
    ir: &IrSpec,
    include_tags: &[String],
    exclude_tags: &[String],
) -> Result<IrSpec, TransformError> {
    if include_tags.is_empty() && exclude_tags.is_empty() {
        return Ok(ir.clone());
    }

    let compile = |patterns: &[String]| -> Result<Vec<Regex>, TransformError> {
        patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    TransformError::Other(format!("invalid tag filter pattern `{p}`: {e}"))
                })
            })
            .collect()
    };

    let include = compile(include_tags)?;
    let exclude = compile(exclude_tags)?;

    let matches = |patterns: &[Regex], tags: &[String]| {
        patterns.iter().any(|re| tags.iter().any(|t| re.is_match(t)))
    };

    let tag_passes = |tag: &str| {
        let single = [tag.to_string()];
        (include.is_empty() || matches(&include, &single)) && !matches(&exclude, &single)
    };

    let operations: Vec<_> = ir
        .operations
        .iter()
        .filter(|op| {
            let tags: Vec<String> = if op.tags.is_empty() {
                vec!["misc".to_string()]
            } else {
                op.tags.clone()
            };
            let included = include.is_empty() || matches(&include, &tags);
            let excluded = matches(&exclude, &tags);
            included && !excluded
        })
        .cloned()
        .map(|mut op| {
            // Reorder tags so the module grouping picks the first tag that
            // itself passes the include/exclude filters, not just the first
            // tag the operation happens to carry.
            if let Some(pos) = op.tags.iter().position(|t| tag_passes(t)) {
                op.tags.swap(0, pos);
            }
            op
        })
        .collect();

    let modules = group_into_modules(&operations);

    IrSpec {
        info: ir.info.clone(),
        servers: ir.servers.clone(),
        schemas: ir.schemas.clone(),
        operations,
        modules,
        security_schemes: ir.security_schemes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{HttpMethod, IrOperation, IrReturnType, NormalizedName};

    fn op(name: &str, tags: Vec<&str>) -> IrOperation {
        IrOperation {
            name: NormalizedName {
                original: name.to_string(),
                pascal_case: name.to_string(),
                camel_case: name.to_string(),
                snake_case: name.to_string(),
                screaming_snake: name.to_string(),
            },
            method: HttpMethod::Get,
            path: format!("/{name}"),
            summary: None,
            description: None,
            tags: tags.into_iter().map(String::from).collect(),
            parameters: vec![],
            request_body: None,
            return_type: IrReturnType::Void,
            deprecated: false,
        }
    }

    fn spec_with(ops: Vec<IrOperation>) -> IrSpec {
        IrSpec {
            info: crate::ir::IrInfo {
                title: "t".into(),
                description: None,
                version: "1".into(),
            },
            servers: vec![],
            schemas: vec![],
            modules: group_into_modules(&ops),
            operations: ops,
            security_schemes: vec![],
        }
    }

    #[test]
    fn include_keeps_only_matching_tags() {
        let ir = spec_with(vec![op("a", vec!["pets"]), op("b", vec!["store"])]);
        let filtered = filter_tags(&ir, &["^pets$".to_string()], &[]).unwrap();
        assert_eq!(filtered.operations.len(), 1);
        assert_eq!(filtered.operations[0].name.original, "a");
    }

    #[test]
    fn exclude_wins_over_include() {
        let ir = spec_with(vec![op("a", vec!["pets"])]);
        let filtered =
            filter_tags(&ir, &["^pets$".to_string()], &["^pets$".to_string()]).unwrap();
        assert!(filtered.operations.is_empty());
    }

    #[test]
    fn no_patterns_is_a_no_op() {
        let ir = spec_with(vec![op("a", vec!["pets"])]);
        let filtered = filter_tags(&ir, &[], &[]).unwrap();
        assert_eq!(filtered.operations.len(), 1);
    }

    #[test]
    fn module_tag_is_first_tag_that_passes_filters() {
        let ir = spec_with(vec![op("a", vec!["internal", "pets"])]);
        let filtered = filter_tags(&ir, &["^pets$".to_string()], &[]).unwrap();
        assert_eq!(filtered.operations.len(), 1);
        assert_eq!(filtered.operations[0].tags[0], "pets");
        assert_eq!(filtered.modules.len(), 1);
        assert_eq!(filtered.modules[0].name.original, "pets");
    }

    #[test]
    fn invalid_pattern_is_a_fatal_config_error() {
        let ir = spec_with(vec![op("a", vec!["pets"])]);
        let err = filter_tags(&ir, &["[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, TransformError::Other(_)));
    }
}

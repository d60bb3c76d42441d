use crate::ir::{IrSecurityScheme, IrSecuritySchemeLocation, IrSecuritySchemeType};
use crate::parse::security::{ApiKeyLocation, SecuritySchemeType};
use crate::parse::spec::OpenApiSpec;

/// Convert `components.securitySchemes` into the IR, sorted by key.
pub fn resolve_security_schemes(spec: &OpenApiSpec) -> Vec<IrSecurityScheme> {
    let Some(ref components) = spec.components else {
        return Vec::new();
    };

    let mut schemes: Vec<IrSecurityScheme> = components
        .security_schemes
        .iter()
        .map(|(key, scheme)| IrSecurityScheme {
            key: key.clone(),
            scheme_type: match scheme.scheme_type {
                SecuritySchemeType::ApiKey => IrSecuritySchemeType::ApiKey,
                SecuritySchemeType::Http => IrSecuritySchemeType::Http,
                SecuritySchemeType::OAuth2 => IrSecuritySchemeType::OAuth2,
                SecuritySchemeType::OpenIdConnect => IrSecuritySchemeType::OpenIdConnect,
                SecuritySchemeType::MutualTLS => IrSecuritySchemeType::MutualTls,
            },
            scheme: scheme.scheme.clone(),
            bearer_format: scheme.bearer_format.clone(),
            location: scheme.location.as_ref().map(|l| match l {
                ApiKeyLocation::Query => IrSecuritySchemeLocation::Query,
                ApiKeyLocation::Header => IrSecuritySchemeLocation::Header,
                ApiKeyLocation::Cookie => IrSecuritySchemeLocation::Cookie,
            }),
            name: scheme.name.clone(),
        })
        .collect();

    schemes.sort_by(|a, b| a.key.cmp(&b.key));
    schemes
}

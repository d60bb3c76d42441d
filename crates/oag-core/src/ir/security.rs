/// A resolved authentication/authorization scheme declared under
/// `components.securitySchemes`. Schemes are carried through to the IR (and
/// sorted by key) so emitters can generate typed auth configuration without
/// re-reading the parsed spec.
#[derive(Debug, Clone)]
pub struct IrSecurityScheme {
    pub key: String,
    pub scheme_type: IrSecuritySchemeType,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub location: Option<IrSecuritySchemeLocation>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrSecuritySchemeType {
    ApiKey,
    Http,
    OAuth2,
    OpenIdConnect,
    MutualTls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrSecuritySchemeLocation {
    Query,
    Header,
    Cookie,
}

pub mod grouping;
pub mod operations;
pub mod schemas;
pub mod security;
pub mod types;

pub use grouping::{OperationGroup, group_operations};
pub use operations::*;
pub use schemas::*;
pub use security::{IrSecurityScheme, IrSecuritySchemeLocation, IrSecuritySchemeType};
pub use types::{IrInfo, IrModule, IrServer, IrSpec, NormalizedName};

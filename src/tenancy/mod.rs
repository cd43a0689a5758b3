//! Mapping request hosts to storefront tenants.

pub mod host;
pub mod resolver;

pub use host::{HostClass, classify_host};
pub use resolver::{OrmTenantDirectory, RequestTenant, TenantDirectory, resolve_tenant};

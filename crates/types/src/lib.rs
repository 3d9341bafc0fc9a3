pub mod ids;
pub mod kind;
pub mod pagination;

pub use ids::{ComponentId, RegistryKey};
pub use kind::{NodeKind, UnknownNodeKind};
pub use pagination::PaginationInfo;

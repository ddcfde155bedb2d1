pub mod dao;
pub mod page;

pub use dao::{LifecycleDao, ParentScopedDao, UserRoleSource};
pub use page::{Counted, ListView, PageRequest, total_of};

//! Role-based access control: pages, the per-member CRUD permission matrix,
//! and the evaluator that combines stored matrices with role overrides.

mod evaluator;
mod matrix;
mod page;

pub use evaluator::{evaluate, is_privileged, PermissionEvaluator, PRIVILEGED_ROLES};
pub use matrix::{CrudRecord, PermissionMatrix};
pub use page::{CrudAction, Page};

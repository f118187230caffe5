//! Domain logic - pure release rules independent of process execution

pub mod branch;
pub mod tag;
pub mod version;

pub use branch::{branch_from_ref, BranchGuard};
pub use tag::ReleaseIdentity;
pub use version::ProjectVersion;

//! Repository access: the collaborator trait and its git2 implementation.

pub mod access;
pub mod repository;
pub mod status;

#[cfg(test)]
pub use access::MockRepositoryAccess;
pub use access::RepositoryAccess;
pub use repository::Git2Repository;

pub mod access;
pub mod memory;

pub use access::{AccessRepository, DeadlineRepository, MySqlAccessRepository, RepositoryError};
pub use memory::InMemoryAccessRepository;

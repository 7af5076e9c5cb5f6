//! In-memory adapters for testing.

mod object_storage;
mod profile;

pub use object_storage::InMemoryObjectStorage;
pub use profile::InMemoryProfileRepository;

mod avatar_processing;
mod object_storage;
mod profile;

pub use avatar_processing::*;
pub use object_storage::*;
pub use profile::*;

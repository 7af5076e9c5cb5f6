mod backend;
mod extractor;

pub use backend::{PostgresTokenAuthenticator, TokenAuthenticator};
pub use extractor::AuthUser;

//! Authentication feature: credential login, session issue/revoke, and the
//! request extractor enforcing the session boundary.

pub mod commands;
pub mod password;
pub mod routes;
pub mod session;

pub use routes::auth_routes;
pub use session::AuthSession;

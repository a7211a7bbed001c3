//! sea-orm entities for the auth service database.

pub mod activation_tokens;
pub mod roles;
pub mod user_roles;
pub mod users;

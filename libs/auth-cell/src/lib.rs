pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use services::{CredentialStore, IdentityService};
pub use store::{InMemoryUserStore, SupabaseUserStore, UserStore};

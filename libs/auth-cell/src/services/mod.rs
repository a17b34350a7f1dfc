pub mod credentials;
pub mod identity;
pub mod password;

pub use credentials::CredentialStore;
pub use identity::IdentityService;
pub use password::PasswordHasherService;

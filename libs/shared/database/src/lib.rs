pub mod error;
pub mod supabase;

pub use error::{DatabaseError, StoreError};
pub use supabase::SupabaseClient;

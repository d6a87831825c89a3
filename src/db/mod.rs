//! Database layer (Supabase REST).

pub mod supabase;

pub use supabase::SupabaseDb;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
}

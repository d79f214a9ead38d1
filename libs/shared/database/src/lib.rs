pub mod memory;
pub mod postgrest;
pub mod seed;
pub mod store;
pub mod supabase;

pub use memory::InMemoryClinicStore;
pub use postgrest::SupabaseClinicStore;
pub use seed::{seed_directory, SeedReport};
pub use store::{AppointmentFilter, ClinicStore, StoreError};
pub use supabase::{SupabaseClient, SupabaseError};

#[cfg(feature = "mocks")]
pub use store::MockClinicStore;

mod local_store;
mod store_factory;
mod supabase_store;

pub use local_store::LocalMediaStore;
pub use store_factory::MediaStoreFactory;
pub use supabase_store::SupabaseMediaStore;

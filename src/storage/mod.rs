// storage/mod.rs
// SQLite-backed index storage

pub mod migrations;
pub mod pool;
pub mod sink;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pool::init_db_pool;
pub use sink::SqliteSink;

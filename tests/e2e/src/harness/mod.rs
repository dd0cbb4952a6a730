//! Test harness: temporary databases and a controllable clock


pub use db_manager::TestDatabaseManager;

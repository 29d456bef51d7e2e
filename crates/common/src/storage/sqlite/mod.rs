//! SQLite backend
//!
//! Provides an r2d2-based connection pool for plain (unencrypted) SQLite
//! databases.

pub mod connection;
pub mod pool;
pub mod pragmas;

pub use connection::SqliteConnection;
pub use pool::SqlitePool;
pub use pragmas::apply_connection_pragmas;

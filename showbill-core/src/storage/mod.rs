pub mod in_memory;
pub mod sqlite;
pub mod traits;

pub use in_memory::InMemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::Storage;

// Draft storage backends.
// - `json_file_store.rs` keeps values in a JSON file on disk.
// - `in_memory.rs` keeps them for the life of the process only.

#[path = "json_file_store.rs"]
pub mod json_file_store;

#[path = "in_memory.rs"]
pub mod in_memory;

pub use in_memory::InMemoryKeyValueStore;
pub use json_file_store::JsonFileKeyValueStore;

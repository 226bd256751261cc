pub mod repository;
pub mod store;

pub use repository::{JsonFileRepository, MemoryRepository, PreferenceRepository, RepositoryError};
pub use store::{PreferenceStore, StoreError};

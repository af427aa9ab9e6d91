pub mod dynamodb;
pub mod memory;
pub mod s3;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use dynamodb::DynamoDbStorage;
pub use memory::{InMemoryImageStorage, InMemoryStorage};
pub use s3::S3ImageStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStorage;

//! Azure Blob Storage uploads, authenticated from a storage connection
//! string with either Shared Key signing or a SAS token.

mod connection_string;
mod container;
mod error;
mod shared_key;

pub use connection_string::{
    ConnectionString, ConnectionStringError, StorageAuth, DEVELOPMENT_ACCOUNT_KEY,
    DEVELOPMENT_ACCOUNT_NAME, DEVELOPMENT_BLOB_ENDPOINT,
};
pub use container::{BlobContainerClient, BlobSink, BLOB_API_VERSION};
pub use error::StorageError;

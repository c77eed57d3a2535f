use thiserror::Error;

use crate::rating::Stars;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Another entity already uses this name (case-insensitively).
    #[error("an entry named '{0}' already exists")]
    DuplicateName(String),

    /// The entity passed for reindexing is not in the directory.
    #[error("no entry named '{0}'")]
    UnknownEntry(String),

    /// The rating given as the entity's old one is not the bucket it sits in.
    #[error("'{name}' is indexed under {indexed} stars, not {claimed}")]
    StaleRating {
        name: String,
        claimed: Stars,
        indexed: Stars,
    },
}

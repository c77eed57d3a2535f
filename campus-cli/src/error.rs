use std::io;
use std::path::PathBuf;

use campus_directory::DirectoryError;
use thiserror::Error;

use crate::model::ServiceType;

/// A rejected command. The display text is the line shown to the user.
///
#[derive(Debug, Error)]
pub enum CommandError {
    // ========================================================================
    // Areas
    // ========================================================================
    #[error("System bounds not defined.")]
    NoAreaLoaded,

    #[error("Invalid bounds.")]
    InvalidBounds,

    #[error("Bounds already exists. Please load it!")]
    BoundsAlreadyExist,

    #[error("Bounds {0} does not exists.")]
    BoundsNotFound(String),

    // ========================================================================
    // Services
    // ========================================================================
    #[error("Invalid service type!")]
    InvalidServiceType,

    #[error("Invalid location!")]
    InvalidLocation,

    #[error("Invalid menu price!")]
    InvalidMenuPrice,

    #[error("Invalid room price!")]
    InvalidRoomPrice,

    #[error("Invalid ticket price.")]
    InvalidTicketPrice,

    #[error("Invalid discount price!")]
    InvalidDiscountPrice,

    #[error("Invalid capacity!")]
    InvalidCapacity,

    #[error("{0} already exists!")]
    ServiceAlreadyExists(String),

    #[error("{0} does not exist!")]
    ServiceNotFound(String),

    #[error("Unknown {0}!")]
    UnknownService(String),

    #[error("{0} is not a valid service!")]
    NotValidService(String),

    #[error("{0} does not control student entry and exit!")]
    NoEntryControl(String),

    #[error("Invalid evaluation!")]
    InvalidEvaluation,

    #[error("Invalid stars!")]
    InvalidStars,

    #[error("No {0} services!")]
    NoServicesOfType(ServiceType),

    #[error("No {0} services with average!")]
    NoServicesWithStars(ServiceType),

    // ========================================================================
    // Students
    // ========================================================================
    #[error("Invalid student type!")]
    InvalidStudentType,

    #[error("lodging {0} does not exist!")]
    LodgingNotFound(String),

    #[error("lodging {0} is full!")]
    LodgingIsFull(String),

    #[error("eating {0} is full!")]
    EatingIsFull(String),

    #[error("{0} already exists!")]
    StudentAlreadyExists(String),

    #[error("{0} does not exist!")]
    StudentNotFound(String),

    #[error("Already there!")]
    AlreadyThere,

    #[error("That is {0}'s home!")]
    AlreadyStudentHome(String),

    #[error("Move is not acceptable for {0}!")]
    MoveNotAcceptable(String),

    #[error("This order does not exists!")]
    InvalidOrder,

    #[error("{0} is thrifty!")]
    StudentIsThrifty(String),

    #[error("{0} has not visited any locations!")]
    NoVisitedLocations(String),

    // ========================================================================
    // Internal
    // ========================================================================
    #[error("could not save area {name}: {source}")]
    SaveFailed {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Failure to read or write a saved area.
///
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no saved area named '{0}'")]
    NotFound(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed area file: {0}")]
    Format(#[from] serde_json::Error),

    /// The file parsed but describes an impossible area.
    #[error("inconsistent area file: {0}")]
    Corrupt(String),
}

impl From<DirectoryError> for StorageError {
    fn from(error: DirectoryError) -> Self {
        StorageError::Corrupt(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Ends or interrupts an interactive session.
///
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input ran out in the middle of, or before, a command.
    #[error("end of input")]
    Exhausted,

    #[error("expected a number, found '{0}'")]
    NotANumber(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

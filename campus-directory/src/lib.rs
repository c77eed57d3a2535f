pub mod entity;
pub mod error;
pub mod rating;
pub mod service_directory;
pub mod student_directory;

pub use entity::{Entity, RatedEntity, ResidentEntity};
pub use error::DirectoryError;
pub use rating::Stars;
pub use service_directory::{ServiceDirectory, TagCursor};
pub use student_directory::{AlphabeticalCursor, StudentDirectory};

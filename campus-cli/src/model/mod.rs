//! Services and students of a campus area.
//!
//! Both are shared through `Rc<RefCell<_>>` handles: the directories index
//! the handles, students point at the services they live in and visit, and
//! services keep weak references back to their occupants.

pub mod service;
pub mod student;

pub use service::{Facility, Occupants, Review, Service, ServiceRef, ServiceType};
pub use student::{Habits, Student, StudentRef, StudentType, Thrift, Visits, WeakStudent};

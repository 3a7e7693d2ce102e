pub mod employee;

pub use employee::{AccessGrant, AccessItem, Employee, PublicationStatus};

// User domain module
// Contains the user record, roles, and value objects

#![allow(clippy::module_inception)]

pub mod user;
pub mod value_objects;

pub use user::{BankInfo, ProfileUpdate, Role, User};
pub use value_objects::{Email, StateName};

// Authentication utilities
// Bearer tokens and password hashing for the identity boundary

pub mod jwt;
pub mod password;

//! Domain models for Portico.
//!
//! These are the types shared by the session layer, the HTTP backend
//! and the console binary.

pub mod credential;
pub mod permission;
pub mod role;
pub mod route;
pub mod user;

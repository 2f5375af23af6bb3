// src/services/mod.rs
// External collaborator services

pub mod google;

pub use google::GoogleAuthService;

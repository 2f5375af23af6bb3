//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Email/password signup and login
//! - Google OAuth login
//! - Access/refresh token minting and validation
//! - Password hashing and verification

pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod store;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use routes::auth_routes;

//! Shared utilities and common types for the Tavern backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Invite token generation
//! - Password hashing with Argon2id
//! - JWT token utilities
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod token;
pub mod validation;

//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64, signed tokens)
//! - Password hashing (Argon2id) and password policy
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;

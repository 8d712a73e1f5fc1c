//! Authentication utilities library
//!
//! Provides reusable credential infrastructure for the account service:
//! - Password hashing (Argon2id)
//! - Opaque token generation and digesting (session ids, reset tokens)
//!
//! The service defines its own store and service traits and consumes these
//! primitives. Keeping them in a separate crate keeps the cryptography in
//! one place without coupling it to any domain logic.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("wrong_password", &hash));
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::token;
//!
//! let raw = token::generate();
//! let digest = token::digest(&raw);
//! // Only the digest is ever persisted; the raw value goes to the caller.
//! assert_eq!(digest, token::digest(&raw));
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;

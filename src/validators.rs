//! Built-in validators.
//!
//! # Examples
//!
//! ```rust
//! use formwarden::validators::{PasswordPolicy, min_length, password_rules};
//! use formwarden::FieldConfig;
//!
//! let password = FieldConfig::new("#password")
//!     .validator(min_length(8))
//!     .validator(password_rules(PasswordPolicy::strict()));
//! ```

pub use formwarden_core::validators::*;

//! Testing utilities for formwarden
//!
//! - [`MemoryDocument`]: an in-memory [`ElementBinding`](formwarden_core::ElementBinding)
//!   double with a small selector engine and awaitable event dispatch
//! - [`fixtures`]: rstest fixtures, including the login page markup
//! - [`logging`]: test log initialization and log capture

pub mod document;
pub mod fixtures;
pub mod logging;
mod selector;

pub use document::{MemoryDocument, MemoryElement};
pub use fixtures::LoginPage;
pub use logging::{LogCapture, init_test_logging};

//! Form validation engine
//!
//! Binds validators to form fields, runs them on user interaction (with
//! optional debouncing), tracks per-field state, renders messages and
//! accessibility attributes, and gates form submission.
//!
//! ## Architecture
//!
//! ```text
//! trigger ──▶ debounce ──▶ runner ──▶ registry ──▶ render / a11y ──▶ notify
//!                                          ▲
//! submit  ──▶ validate_form ───────────────┘ (+ cross-field validator)
//! ```
//!
//! - [`FormValidator`]: the handle returned to callers
//! - [`FormConfig`] / [`FieldConfig`]: builders describing the form
//! - [`ValidatorSettings`]: shared defaults, loadable from TOML
//! - [`ApiResponse`]: server answers mapped onto form messages
//!
//! The engine talks to its host only through
//! [`ElementBinding`](formwarden_core::ElementBinding) and runs on a single
//! thread; debouncing uses `tokio::time`.

mod a11y;
mod codec;
pub mod config;
mod debounce;
pub mod error;
mod events;
pub mod form;
mod registry;
pub mod render;
pub mod response;
mod runner;
pub mod settings;

pub use config::{
	ElementSource, FieldConfig, FormConfig, MessageRenderArgs, MessageTarget, RenderCallback,
	ValidatorOptions, ValueGetter, ValueSetter,
};
pub use error::{FormValidatorError, FormValidatorResult};
pub use form::{FieldErrors, FormValidator};
pub use registry::FieldState;
pub use render::{below_field_message, to_summary};
pub use response::{ApiResponse, ErrorName, GENERIC_FAILURE_MESSAGE};
pub use settings::{ClassNames, ValidatorSettings};

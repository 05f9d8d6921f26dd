//! rstest fixtures
//!
//! ```ignore
//! use formwarden_test::fixtures::{LoginPage, login_page};
//! use rstest::rstest;
//!
//! #[rstest]
//! fn test_something(login_page: LoginPage) {
//!     login_page.document.type_text(login_page.email, "a@b.co");
//! }
//! ```

use crate::document::MemoryDocument;
use formwarden_core::ElementRef;
use rstest::fixture;

/// Empty in-memory document.
#[fixture]
pub fn document() -> MemoryDocument {
	MemoryDocument::new()
}

/// Markup of the login page, with handles to every element the validator
/// cares about.
#[derive(Clone)]
pub struct LoginPage {
	pub document: MemoryDocument,
	/// `<form id="login-form">`
	pub form: ElementRef,
	/// `<input id="email" type="email" name="email">`
	pub email: ElementRef,
	/// `<ul id="email-errors" class="hidden">`
	pub email_errors: ElementRef,
	/// `<input id="password" type="password" name="password">`
	pub password: ElementRef,
	/// `<p class="password-hint hidden">`, deliberately without an id
	pub password_hint: ElementRef,
	/// `<ul id="form-errors" class="hidden">`
	pub summary: ElementRef,
	/// `<button type="submit">`
	pub submit: ElementRef,
}

#[fixture]
pub fn login_page() -> LoginPage {
	let document = MemoryDocument::new();
	let form = document.append("form", &[("id", "login-form"), ("class", "mt-6 space-y-4")]);
	let email = document.append("input", &[("id", "email"), ("type", "email"), ("name", "email")]);
	let email_errors = document.append("ul", &[("id", "email-errors"), ("class", "hidden")]);
	let password = document.append(
		"input",
		&[("id", "password"), ("type", "password"), ("name", "password")],
	);
	let password_hint = document.append("p", &[("class", "password-hint hidden")]);
	let submit = document.append("button", &[("type", "submit")]);
	let summary = document.append("ul", &[("id", "form-errors"), ("class", "hidden")]);

	LoginPage {
		document,
		form,
		email,
		email_errors,
		password,
		password_hint,
		summary,
		submit,
	}
}

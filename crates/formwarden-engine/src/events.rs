//! Event binder
//!
//! Attaches one listener per configured trigger to every bound field and,
//! when submit validation is on, a submit listener to the form. Listeners
//! hold a weak reference to the validator and do nothing once it is gone.

use crate::form::FormInner;
use formwarden_core::{EventKind, EventOutcome, Listener};
use futures::FutureExt;
use std::rc::{Rc, Weak};

pub(crate) fn bind(inner: &Rc<FormInner>) {
	let mut registered = Vec::new();

	for field in inner.fields.iter() {
		let Some(element) = field.element else {
			continue;
		};
		for trigger in &field.config.triggers {
			let event = EventKind::from(*trigger);
			let id = inner
				.binding
				.add_listener(element, event, field_listener(inner, &field.name));
			registered.push((element, id));
		}
	}

	if inner.settings.validate_on_submit
		&& let Some(form) = inner.form_element
	{
		let id = inner
			.binding
			.add_listener(form, EventKind::Submit, submit_listener(inner));
		registered.push((form, id));
	}

	tracing::debug!(listeners = registered.len(), "form validator attached");
	inner.listeners.borrow_mut().extend(registered);
}

fn field_listener(inner: &Rc<FormInner>, name: &str) -> Listener {
	let weak: Weak<FormInner> = Rc::downgrade(inner);
	let name = name.to_string();
	Rc::new(move |event: EventKind| {
		let weak = weak.clone();
		let name = name.clone();
		async move {
			let Some(inner) = weak.upgrade() else {
				return EventOutcome::proceed();
			};
			let Ok(field) = inner.fields.get(&name) else {
				return EventOutcome::proceed();
			};
			inner.touch_field(field);
			if let Err(error) = inner.validate_touched(field).await {
				tracing::error!(field = %name, event = %event, %error, "field validation failed");
			}
			EventOutcome::proceed()
		}
		.boxed_local()
	})
}

fn submit_listener(inner: &Rc<FormInner>) -> Listener {
	let weak: Weak<FormInner> = Rc::downgrade(inner);
	Rc::new(move |_event: EventKind| {
		let weak = weak.clone();
		async move {
			let Some(inner) = weak.upgrade() else {
				return EventOutcome::proceed();
			};
			if !inner.settings.prevent_submit_if_invalid {
				return EventOutcome::proceed();
			}
			match inner.validate_form().await {
				Ok(true) => EventOutcome::proceed(),
				Ok(false) => {
					tracing::debug!("submission blocked by invalid form");
					EventOutcome::suppress()
				}
				Err(error) => {
					tracing::error!(%error, "form validation failed on submit");
					EventOutcome::suppress()
				}
			}
		}
		.boxed_local()
	})
}

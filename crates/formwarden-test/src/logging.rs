//! Test logging utilities
//!
//! [`init_test_logging`] routes engine logs to the test output, and
//! [`LogCapture`] records events so tests can assert on warnings.

use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// # Examples
///
/// ```
/// use formwarden_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_test_writer()
			.with_max_level(tracing::Level::DEBUG)
			.try_init();
	});
}

/// A tracing layer that captures formatted events.
///
/// Each entry looks like `[WARN] message key=value ...`.
#[derive(Clone, Default)]
pub struct LogCapture {
	logs: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
	/// Install a capturing subscriber for the current thread.
	///
	/// Events are recorded until the returned guard is dropped.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_test::logging::LogCapture;
	///
	/// let (capture, _guard) = LogCapture::install();
	/// tracing::warn!(selector = "#missing", "element not found");
	/// assert!(capture.contains("WARN", "element not found"));
	/// ```
	pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
		let capture = Self::default();
		let guard = tracing_subscriber::registry()
			.with(capture.clone())
			.set_default();
		(capture, guard)
	}

	pub fn logs(&self) -> Vec<String> {
		self.logs.lock().map(|l| l.clone()).unwrap_or_default()
	}

	/// Whether any captured entry has `level` and contains `needle`.
	pub fn contains(&self, level: &str, needle: &str) -> bool {
		self.logs()
			.iter()
			.any(|log| log.starts_with(&format!("[{level}]")) && log.contains(needle))
	}
}

struct EventVisitor {
	message: String,
	fields: Vec<String>,
}

impl tracing::field::Visit for EventVisitor {
	fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
		if field.name() == "message" {
			self.message = format!("{:?}", value);
		} else {
			self.fields.push(format!("{}={:?}", field.name(), value));
		}
	}

	fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
		if field.name() == "message" {
			self.message = value.to_string();
		} else {
			self.fields.push(format!("{}={}", field.name(), value));
		}
	}
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
		let mut visitor = EventVisitor {
			message: String::new(),
			fields: Vec::new(),
		};
		event.record(&mut visitor);

		let mut line = format!("[{}] {}", event.metadata().level(), visitor.message);
		for field in visitor.fields {
			line.push(' ');
			line.push_str(&field);
		}
		if let Ok(mut logs) = self.logs.lock() {
			logs.push(line);
		}
	}
}

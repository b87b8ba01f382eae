//! [`Signal`]: the envelope carrying one opaque payload plus string labels
//! between components.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One unit of data moving through a pipe.
///
/// The payload is type-erased: the core never inspects it, only components
/// on either end of a pipe agree on a concrete type by convention. Cloning a
/// `Signal` is cheap (an `Arc` bump plus a small label map copy) since the
/// transport step must duplicate a signal once per outgoing pipe.
#[derive(Clone)]
pub struct Signal {
	payload: Option<Arc<dyn Any + Send + Sync>>,
	labels: BTreeMap<String, String>,
}

impl Signal {
	/// Wrap a typed payload into a signal.
	pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
		Self {
			payload: Some(Arc::new(payload)),
			labels: BTreeMap::new(),
		}
	}

	/// A signal carrying no payload (nil is allowed by the data model).
	pub fn empty() -> Self {
		Self {
			payload: None,
			labels: BTreeMap::new(),
		}
	}

	/// True if this signal carries no payload.
	pub fn is_empty(&self) -> bool {
		self.payload.is_none()
	}

	/// Borrow the payload as a concrete type, if it holds one and the type matches.
	pub fn payload<T: Any>(&self) -> Option<&T> {
		self.payload.as_ref().and_then(|p| p.downcast_ref::<T>())
	}

	/// Attach a label, returning `self` for chaining.
	pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.labels.insert(key.into(), value.into());
		self
	}

	/// Read a label by key.
	pub fn label(&self, key: &str) -> Option<&str> {
		self.labels.get(key).map(String::as_str)
	}

	/// All labels attached to this signal.
	pub fn labels(&self) -> &BTreeMap<String, String> {
		&self.labels
	}
}

impl fmt::Debug for Signal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("payload", &self.payload.as_ref().map(|_| "<opaque>"))
			.field("labels", &self.labels)
			.finish()
	}
}

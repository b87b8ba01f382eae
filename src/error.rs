//! The single error type shared by builders, activation, transport and the
//! mesh driver.

use smartstring::{LazyCompact, SmartString};

/// A component or port name. A thin alias over `smartstring`'s inline-stored
/// string type, since most names are short enough to never heap-allocate.
pub type Name = SmartString<LazyCompact>;

/// Every way a mesh, component, port or run can fail.
///
/// `WaitForInputs` is not a failure in the usual sense: it is the "try again
/// next cycle" signal a callback returns through the same `Result<(), Error>`
/// used for real errors. `maybe_activate` matches on it before anything else
/// gets classified as `ComponentReturnedError`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
	// MARK: lookup / construction errors
	#[error("not found: {what}")]
	NotFound { what: String },

	#[error("wrong port direction: {context}")]
	WrongPortDirection { context: String },

	#[error("duplicate name: {name}")]
	DuplicateName { name: Name },

	// MARK: activation errors
	#[error("component `{component}` returned an error: {source}")]
	ComponentReturnedError {
		component: Name,
		#[source]
		source: Box<Error>,
	},

	#[error("component `{component}` panicked: {message}")]
	ComponentPanicked { component: Name, message: String },

	/// Internal: a callback asking the scheduler to retry next cycle.
	#[error("component is waiting for more inputs (keep={keep})")]
	WaitForInputs { keep: bool },

	// MARK: run-level terminal errors
	#[error("unsupported error handling strategy")]
	UnsupportedErrorHandlingStrategy,

	#[error("reached the maximum allowed number of cycles")]
	ReachedMaxAllowedCycles,

	#[error("hit an error or a panic in cycle {cycle}")]
	HitAnErrorOrPanic { cycle: u64 },

	#[error("hit a panic in cycle {cycle}")]
	HitAPanic { cycle: u64 },

	#[error("exceeded the configured time limit")]
	TimeLimitExceeded,

	#[error("validation failed: {reason}")]
	ValidationFailed { reason: String },
}

impl Error {
	pub(crate) fn not_found(what: impl Into<String>) -> Self {
		Self::NotFound { what: what.into() }
	}

	pub(crate) fn wrong_direction(context: impl Into<String>) -> Self {
		Self::WrongPortDirection {
			context: context.into(),
		}
	}

	pub(crate) fn duplicate_name(name: impl Into<Name>) -> Self {
		Self::DuplicateName { name: name.into() }
	}

	pub(crate) fn validation_failed(reason: impl Into<String>) -> Self {
		Self::ValidationFailed {
			reason: reason.into(),
		}
	}

	/// True for the internal wait-for-inputs signal, as opposed to a real error.
	pub fn is_wait_for_inputs(&self) -> bool {
		matches!(self, Self::WaitForInputs { .. })
	}

	/// Construct the "wait, keep inputs" signal a callback returns to ask for
	/// another cycle without losing what's already on its input buffers.
	pub fn wait_keep() -> Self {
		Self::WaitForInputs { keep: true }
	}

	/// Construct the "wait, discard inputs" signal.
	pub fn wait_clear() -> Self {
		Self::WaitForInputs { keep: false }
	}
}

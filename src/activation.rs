//! The activation outcome taxonomy and the per-attempt result record.

use crate::component::{ActivationContext, Component};
use crate::error::{Error, Name};

/// The tagged outcome of one activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
	Ok,
	NoInput,
	NoFunction,
	ReturnedError,
	Panicked,
	WaitingForInputsClear,
	WaitingForInputsKeep,
}

impl ActivationOutcome {
	/// `true` iff the callback was entered at all.
	pub fn activated(self) -> bool {
		!matches!(self, Self::NoInput | Self::NoFunction)
	}
}

/// The record of one activation attempt for one component in one cycle.
#[derive(Debug, Clone)]
pub struct ActivationResult {
	component: Name,
	activated: bool,
	outcome: Option<ActivationOutcome>,
	error: Option<Error>,
}

impl ActivationResult {
	pub fn component(&self) -> &Name {
		&self.component
	}

	pub fn activated(&self) -> bool {
		self.activated
	}

	/// `None` only in the defensive "component already carried a chain
	/// error" state; validation guarantees this never happens on a real run.
	pub fn outcome(&self) -> Option<ActivationOutcome> {
		self.outcome
	}

	pub fn error(&self) -> Option<&Error> {
		self.error.as_ref()
	}

	/// Single source of truth for the `activated` flag: derived from the
	/// outcome via `ActivationOutcome::activated` rather than hand-duplicated
	/// at each call site below.
	fn new(component: Name, outcome: Option<ActivationOutcome>, error: Option<Error>) -> Self {
		Self {
			component,
			activated: outcome.is_some_and(ActivationOutcome::activated),
			outcome,
			error,
		}
	}

	fn chain_error(component: Name, error: Error) -> Self {
		Self::new(component, None, Some(error))
	}

	fn no_function(component: Name) -> Self {
		Self::new(component, Some(ActivationOutcome::NoFunction), None)
	}

	fn no_input(component: Name) -> Self {
		Self::new(component, Some(ActivationOutcome::NoInput), None)
	}

	fn ok(component: Name) -> Self {
		Self::new(component, Some(ActivationOutcome::Ok), None)
	}

	fn waiting(component: Name, keep: bool) -> Self {
		let outcome = if keep {
			ActivationOutcome::WaitingForInputsKeep
		} else {
			ActivationOutcome::WaitingForInputsClear
		};
		Self::new(component, Some(outcome), None)
	}

	fn returned_error(component: Name, source: Error) -> Self {
		let error = Error::ComponentReturnedError {
			component: component.clone(),
			source: Box::new(source),
		};
		Self::new(component, Some(ActivationOutcome::ReturnedError), Some(error))
	}

	fn panicked(component: Name, message: String) -> Self {
		let error = Error::ComponentPanicked {
			component: component.clone(),
			message,
		};
		Self::new(component, Some(ActivationOutcome::Panicked), Some(error))
	}
}

/// Run the activation state machine for one component, catching any panic
/// the callback raises so it never escapes this function.
pub(crate) fn maybe_activate(component: &mut Component) -> ActivationResult {
	let name = component.name().clone();

	if let Some(err) = component.chain_error() {
		return ActivationResult::chain_error(name, err.clone());
	}
	if !component.has_activation_function() {
		return ActivationResult::no_function(name);
	}
	if !component.any_input_has_signals() {
		return ActivationResult::no_input(name);
	}

	let callback = component
		.activation_fn()
		.expect("has_activation_function just returned true");

	let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
		let mut ctx = ActivationContext::new(component);
		callback(&mut ctx)
	}));

	match outcome {
		Ok(Ok(())) => ActivationResult::ok(name),
		Ok(Err(Error::WaitForInputs { keep })) => ActivationResult::waiting(name, keep),
		Ok(Err(other)) => ActivationResult::returned_error(name, other),
		Err(panic) => ActivationResult::panicked(name, panic_message(panic)),
	}
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
	if let Some(message) = panic.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_function_when_callback_missing() {
		let mut comp = Component::new("a").add_inputs(["in"]);
		let result = maybe_activate(&mut comp);
		assert_eq!(result.outcome(), Some(ActivationOutcome::NoFunction));
		assert!(!result.activated());
	}

	#[test]
	fn no_input_when_buffers_empty() {
		let mut comp = Component::new("a")
			.add_inputs(["in"])
			.with_activation_func(|_| Ok(()));
		let result = maybe_activate(&mut comp);
		assert_eq!(result.outcome(), Some(ActivationOutcome::NoInput));
	}

	#[test]
	fn panic_is_caught_and_tagged() {
		use crate::signal::Signal;
		let mut comp = Component::new("a")
			.add_inputs(["in"])
			.with_activation_func(|_| panic!("boom"));
		comp.input_by_name_mut("in").unwrap().put_signals([Signal::new(1_i32)]);
		let result = maybe_activate(&mut comp);
		assert_eq!(result.outcome(), Some(ActivationOutcome::Panicked));
		assert!(matches!(result.error(), Some(Error::ComponentPanicked { .. })));
	}

	#[test]
	fn wait_for_inputs_keep_is_classified() {
		use crate::signal::Signal;
		let mut comp = Component::new("a")
			.add_inputs(["in"])
			.with_activation_func(|_| Err(Error::wait_keep()));
		comp.input_by_name_mut("in").unwrap().put_signals([Signal::new(1_i32)]);
		let result = maybe_activate(&mut comp);
		assert_eq!(result.outcome(), Some(ActivationOutcome::WaitingForInputsKeep));
		assert!(result.error().is_none());
	}
}

//! [`Component`] and its fluent builder surface.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Name};
use crate::logger::{Logger, NullLogger};
use crate::port::{Direction, Port};
use crate::state::{MapStateBag, StateBag};

/// The callback a component runs once per activation.
pub type ActivationFn = Arc<dyn Fn(&mut ActivationContext<'_>) -> Result<(), Error> + Send + Sync>;

/// A named, independently-schedulable unit of work: input/output port sets,
/// an optional activation callback, a state bag, and a logger.
///
/// Construction is fluent with a sticky error slot, mirroring
/// [`crate::port::Port`].
pub struct Component {
	name: Name,
	description: String,
	labels: BTreeMap<String, String>,
	inputs: BTreeMap<Name, Port>,
	outputs: BTreeMap<Name, Port>,
	activation_fn: Option<ActivationFn>,
	state: Box<dyn StateBag>,
	logger: Arc<dyn Logger>,
	parent_mesh: Option<Name>,
	error: Option<Error>,
}

impl Component {
	pub fn new(name: impl Into<Name>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			labels: BTreeMap::new(),
			inputs: BTreeMap::new(),
			outputs: BTreeMap::new(),
			activation_fn: None,
			state: Box::new(MapStateBag::new()),
			logger: Arc::new(NullLogger),
			parent_mesh: None,
			error: None,
		}
	}

	pub fn name(&self) -> &Name {
		&self.name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		if self.error.is_some() {
			return self;
		}
		self.description = description.into();
		self
	}

	pub fn add_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		if self.error.is_some() {
			return self;
		}
		self.labels.insert(key.into(), value.into());
		self
	}

	/// Build and attach bare input ports by name. Convenience sugar over
	/// [`Component::attach_input_ports`].
	pub fn add_inputs<I, S>(self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		let ports = names.into_iter().map(|n| Port::new_input(n)).collect::<Vec<_>>();
		self.attach_input_ports(ports)
	}

	/// Build and attach bare output ports by name. Convenience sugar over
	/// [`Component::attach_output_ports`].
	pub fn add_outputs<I, S>(self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Name>,
	{
		let ports = names.into_iter().map(|n| Port::new_output(n)).collect::<Vec<_>>();
		self.attach_output_ports(ports)
	}

	/// Graft pre-built ports (standalone, possibly chained with `pipe_to`)
	/// onto this component's input set. Fails with `DuplicateName` on a name
	/// collision, or propagates a port's own sticky builder error.
	pub fn attach_input_ports(self, ports: impl IntoIterator<Item = Port>) -> Self {
		self.attach_ports(ports, Direction::Input)
	}

	/// Graft pre-built ports onto this component's output set.
	pub fn attach_output_ports(self, ports: impl IntoIterator<Item = Port>) -> Self {
		self.attach_ports(ports, Direction::Output)
	}

	fn attach_ports(mut self, ports: impl IntoIterator<Item = Port>, expected: Direction) -> Self {
		for port in ports {
			if self.error.is_some() {
				return self;
			}
			let port = match port.into_result() {
				Ok(port) => port,
				Err(err) => {
					self.error = Some(err);
					return self;
				}
			};
			if port.direction() != expected {
				self.error = Some(Error::wrong_direction(format!(
					"port `{}` attached as {:?} but built as {:?}",
					port.name(),
					expected,
					port.direction()
				)));
				return self;
			}
			let set = match expected {
				Direction::Input => &mut self.inputs,
				Direction::Output => &mut self.outputs,
			};
			if set.contains_key(port.name()) {
				self.error = Some(Error::duplicate_name(port.name().clone()));
				return self;
			}
			set.insert(port.name().clone(), port);
		}
		self
	}

	pub fn with_activation_func<F>(mut self, callback: F) -> Self
	where
		F: Fn(&mut ActivationContext<'_>) -> Result<(), Error> + Send + Sync + 'static,
	{
		if self.error.is_some() {
			return self;
		}
		self.activation_fn = Some(Arc::new(callback));
		self
	}

	pub fn with_initial_state(mut self, state: impl StateBag + 'static) -> Self {
		if self.error.is_some() {
			return self;
		}
		self.state = Box::new(state);
		self
	}

	pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
		if self.error.is_some() {
			return self;
		}
		self.logger = Arc::new(logger);
		self
	}

	pub fn chain_error(&self) -> Option<&Error> {
		self.error.as_ref()
	}

	pub(crate) fn set_chain_error(&mut self, err: Error) {
		self.error = Some(err);
	}

	pub(crate) fn set_parent_mesh(&mut self, mesh: Name) {
		self.parent_mesh = Some(mesh);
	}

	pub(crate) fn parent_mesh(&self) -> Option<&Name> {
		self.parent_mesh.as_ref()
	}

	pub fn has_activation_function(&self) -> bool {
		self.activation_fn.is_some()
	}

	pub fn any_input_has_signals(&self) -> bool {
		self.inputs.values().any(Port::has_signals)
	}

	pub fn input_by_name(&self, name: &str) -> Result<&Port, Error> {
		self.inputs
			.get(name)
			.ok_or_else(|| Error::not_found(format!("input port `{name}`")))
	}

	pub fn input_by_name_mut(&mut self, name: &str) -> Result<&mut Port, Error> {
		self.inputs
			.get_mut(name)
			.ok_or_else(|| Error::not_found(format!("input port `{name}`")))
	}

	pub fn output_by_name(&self, name: &str) -> Result<&Port, Error> {
		self.outputs
			.get(name)
			.ok_or_else(|| Error::not_found(format!("output port `{name}`")))
	}

	pub fn output_by_name_mut(&mut self, name: &str) -> Result<&mut Port, Error> {
		self.outputs
			.get_mut(name)
			.ok_or_else(|| Error::not_found(format!("output port `{name}`")))
	}

	pub fn inputs(&self) -> impl Iterator<Item = (&Name, &Port)> {
		self.inputs.iter()
	}

	pub fn outputs(&self) -> impl Iterator<Item = (&Name, &Port)> {
		self.outputs.iter()
	}

	pub fn outputs_mut(&mut self) -> impl Iterator<Item = (&Name, &mut Port)> {
		self.outputs.iter_mut()
	}

	pub fn logger(&self) -> &Arc<dyn Logger> {
		&self.logger
	}

	pub fn state(&self) -> &dyn StateBag {
		self.state.as_ref()
	}

	pub fn state_mut(&mut self) -> &mut dyn StateBag {
		self.state.as_mut()
	}

	/// Drain every input port's buffer.
	pub(crate) fn clear_inputs(&mut self) {
		for port in self.inputs.values_mut() {
			port.clear();
		}
	}

	pub(crate) fn activation_fn(&self) -> Option<ActivationFn> {
		self.activation_fn.clone()
	}
}

/// The handle passed into an activation callback: named access to this
/// component's own ports, its state bag, and its logger.
pub struct ActivationContext<'a> {
	component: &'a mut Component,
}

impl<'a> ActivationContext<'a> {
	pub(crate) fn new(component: &'a mut Component) -> Self {
		Self { component }
	}

	pub fn input_by_name(&self, name: &str) -> Result<&Port, Error> {
		self.component.input_by_name(name)
	}

	pub fn input_by_name_mut(&mut self, name: &str) -> Result<&mut Port, Error> {
		self.component.input_by_name_mut(name)
	}

	pub fn output_by_name(&self, name: &str) -> Result<&Port, Error> {
		self.component.output_by_name(name)
	}

	pub fn output_by_name_mut(&mut self, name: &str) -> Result<&mut Port, Error> {
		self.component.output_by_name_mut(name)
	}

	pub fn state(&self) -> &dyn StateBag {
		self.component.state()
	}

	pub fn state_mut(&mut self) -> &mut dyn StateBag {
		self.component.state_mut()
	}

	pub fn logger(&self) -> &Arc<dyn Logger> {
		self.component.logger()
	}
}

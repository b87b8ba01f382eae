//! [`Port`], its [`PortBuffer`], and the [`PipeTarget`] a `Pipe` ultimately
//! resolves to.

use crate::error::{Error, Name};
use crate::signal::Signal;

/// Whether a port accepts signals (`Input`) or produces them (`Output`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Input,
	Output,
}

/// An ordered multiset of signals held on one port.
///
/// Order is preserved for determinism but callers must not rely on it across
/// fan-in from distinct sources.
#[derive(Debug, Default, Clone)]
pub struct PortBuffer {
	signals: Vec<Signal>,
}

impl PortBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, signal: Signal) {
		self.signals.push(signal);
	}

	pub fn extend(&mut self, signals: impl IntoIterator<Item = Signal>) {
		self.signals.extend(signals);
	}

	pub fn all_signals(&self) -> &[Signal] {
		&self.signals
	}

	pub fn first_payload<T: std::any::Any>(&self) -> Result<Option<&T>, Error> {
		let first = self
			.signals
			.first()
			.ok_or_else(|| Error::not_found("no signal on port buffer"))?;
		Ok(first.payload::<T>())
	}

	pub fn has_signals(&self) -> bool {
		!self.signals.is_empty()
	}

	pub fn count(&self) -> usize {
		self.signals.len()
	}

	/// Drain and return every signal, leaving the buffer empty.
	pub fn drain_all(&mut self) -> Vec<Signal> {
		std::mem::take(&mut self.signals)
	}

	pub fn clear(&mut self) {
		self.signals.clear();
	}
}

/// An unresolved destination endpoint of a pipe: a component name and a port
/// name on it, resolved through the owning mesh's registry at flush and
/// validation time rather than a raw numeric handle, since a pipe can be
/// declared before its destination component is ever registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeTarget {
	pub component: Name,
	pub port: Name,
}

/// A named endpoint on a component: a direction, a buffer, labels, and (for
/// output ports) the list of pipes fed by this port.
///
/// `Port` acts as its own fluent builder (`new_input`/`new_output`,
/// `with_description`, `add_label`, `pipe_to`); builder misuse is recorded in
/// a sticky `error` slot surfaced when the port is attached to a component or
/// validated, rather than panicking immediately.
#[derive(Debug, Clone)]
pub struct Port {
	name: Name,
	direction: Direction,
	description: String,
	labels: std::collections::BTreeMap<String, String>,
	buffer: PortBuffer,
	pipes: Vec<PipeTarget>,
	error: Option<Error>,
}

impl Port {
	pub fn new_input(name: impl Into<Name>) -> Self {
		Self::new(name, Direction::Input)
	}

	pub fn new_output(name: impl Into<Name>) -> Self {
		Self::new(name, Direction::Output)
	}

	fn new(name: impl Into<Name>, direction: Direction) -> Self {
		Self {
			name: name.into(),
			direction,
			description: String::new(),
			labels: std::collections::BTreeMap::new(),
			buffer: PortBuffer::new(),
			pipes: Vec::new(),
			error: None,
		}
	}

	pub fn name(&self) -> &Name {
		&self.name
	}

	pub fn direction(&self) -> Direction {
		self.direction
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

	pub fn label(&self, key: &str) -> Option<&str> {
		self.labels.get(key).map(String::as_str)
	}

	/// Append a pipe from this output port to `(component, port)`. Fails with
	/// `WrongPortDirection` if this port is an input port.
	pub fn pipe_to(mut self, component: impl Into<Name>, port: impl Into<Name>) -> Self {
		if self.error.is_some() {
			return self;
		}
		if self.direction != Direction::Output {
			self.error = Some(Error::wrong_direction(format!(
				"pipe_to called on input port `{}`",
				self.name
			)));
			return self;
		}
		self.pipes.push(PipeTarget {
			component: component.into(),
			port: port.into(),
		});
		self
	}

	pub fn pipes(&self) -> &[PipeTarget] {
		&self.pipes
	}

	/// The sticky builder error, if any call on this port has failed.
	pub fn chain_error(&self) -> Option<&Error> {
		self.error.as_ref()
	}

	pub fn into_result(self) -> Result<Self, Error> {
		match self.error.clone() {
			Some(err) => Err(err),
			None => Ok(self),
		}
	}

	// -- operations exposed to activation callbacks --

	pub fn put_signals(&mut self, signals: impl IntoIterator<Item = Signal>) {
		self.buffer.extend(signals);
	}

	pub fn all_signals(&self) -> &[Signal] {
		self.buffer.all_signals()
	}

	pub fn first_payload<T: std::any::Any>(&self) -> Result<Option<&T>, Error> {
		self.buffer.first_payload::<T>()
	}

	pub fn has_signals(&self) -> bool {
		self.buffer.has_signals()
	}

	pub fn clear(&mut self) {
		self.buffer.clear();
	}

	pub(crate) fn buffer(&self) -> &PortBuffer {
		&self.buffer
	}

	pub(crate) fn buffer_mut(&mut self) -> &mut PortBuffer {
		&mut self.buffer
	}
}

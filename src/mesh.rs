//! [`Mesh`]: the component registry, cycle driver, and public entry point.

use std::collections::BTreeMap;

use crate::activation::{maybe_activate, ActivationOutcome};
use crate::component::Component;
use crate::config::{ErrorHandlingStrategy, MeshConfig};
use crate::cycle::Cycle;
use crate::error::{Error, Name};
use crate::hooks::{HooksBuilder, MeshHooks};
use crate::runtime::RuntimeInfo;
use crate::transport::transport_step;
use crate::validation::validate;

/// The component registry, config, runtime history, hooks, and the sole
/// chainable-error slot shared by builder misuse and run-level termination.
pub struct Mesh {
	name: Name,
	components: Vec<Component>,
	name_index: BTreeMap<Name, usize>,
	config: MeshConfig,
	runtime_info: RuntimeInfo,
	hooks: MeshHooks,
	error: Option<Error>,
}

impl Mesh {
	pub fn new(name: impl Into<Name>) -> Self {
		Self::new_with_config(name, MeshConfig::default())
	}

	pub fn new_with_config(name: impl Into<Name>, config: MeshConfig) -> Self {
		Self {
			name: name.into(),
			components: Vec::new(),
			name_index: BTreeMap::new(),
			config,
			runtime_info: RuntimeInfo::new(),
			hooks: MeshHooks::default(),
			error: None,
		}
	}

	pub fn name(&self) -> &Name {
		&self.name
	}

	/// Register components. Names must be unique mesh-wide; a duplicate is a
	/// sticky `DuplicateName` chain error.
	pub fn add_components(mut self, components: impl IntoIterator<Item = Component>) -> Self {
		for mut component in components {
			if self.error.is_some() {
				return self;
			}
			if self.name_index.contains_key(component.name()) {
				self.error = Some(Error::duplicate_name(component.name().clone()));
				return self;
			}
			component.set_parent_mesh(self.name.clone());
			let idx = self.components.len();
			self.name_index.insert(component.name().clone(), idx);
			self.components.push(component);
		}
		self
	}

	pub fn component_by_name(&self, name: &str) -> Option<&Component> {
		self.name_index.get(name).map(|&idx| &self.components[idx])
	}

	pub(crate) fn components(&self) -> impl Iterator<Item = &Component> {
		self.components.iter()
	}

	/// Register before/after-run and per-activation hooks.
	pub fn setup_hooks<F>(mut self, f: F) -> Self
	where
		F: FnOnce(HooksBuilder) -> HooksBuilder,
	{
		if self.error.is_some() {
			return self;
		}
		self.hooks = f(HooksBuilder::default()).build();
		self
	}

	pub fn chain_error(&self) -> Option<&Error> {
		self.error.as_ref()
	}

	/// Validate, then run cycles until `must_stop` fires.
	pub fn run(mut self) -> (RuntimeInfo, Option<Error>) {
		self.runtime_info.mark_started();

		if let Some(err) = self.error.clone() {
			self.runtime_info.mark_stopped();
			return (self.runtime_info, Some(err));
		}

		if let Err(err) = validate(&self) {
			self.runtime_info.mark_stopped();
			return (self.runtime_info, Some(err));
		}

		if let Err(err) = self.hooks.run_before_run(&self) {
			self.runtime_info.mark_stopped();
			return (self.runtime_info, Some(err));
		}

		loop {
			let cycle = self.run_cycle();
			tracing::debug!(cycle = cycle.number(), mesh = %self.name, "cycle activated");
			self.runtime_info.push_cycle(cycle);
			let cycle = self
				.runtime_info
				.cycles()
				.last()
				.expect("a cycle was just pushed");

			if let Err(err) = transport_step(&mut self.components, &self.name_index, cycle) {
				tracing::debug!(cycle = cycle.number(), %err, "transport step failed");
				self.error = Some(err);
			}

			let (should_stop, err) = self.must_stop(cycle);
			if let Some(err) = &err {
				tracing::debug!(cycle = cycle.number(), %err, "run terminating");
			}
			if let Some(err) = err {
				self.error = Some(err);
			}
			if should_stop {
				break;
			}
		}

		self.runtime_info.mark_stopped();
		self.hooks.run_after_run(&self.runtime_info);
		(self.runtime_info, self.error)
	}

	/// Activate every component in parallel, collecting results keyed by
	/// name. Each activation's panic is caught inside `maybe_activate`, so
	/// the spawned threads themselves never panic.
	fn run_cycle(&mut self) -> Cycle {
		let number = self.runtime_info.cycles().len() as u64 + 1;
		let hooks = &self.hooks;

		let results: BTreeMap<Name, crate::activation::ActivationResult> =
			std::thread::scope(|scope| {
				let handles: Vec<_> = self
					.components
					.iter_mut()
					.map(|component| {
						let hooks = hooks.clone();
						scope.spawn(move || {
							// Hook bodies are user code too; a panicking hook must not
							// take the whole cycle down with it.
							if std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
								hooks.run_before_activation(component)
							}))
							.is_err()
							{
								tracing::warn!(component = %component.name(), "before-activation hook panicked");
							}

							let result = maybe_activate(component);

							if std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
								hooks.run_after_activation(component, &result)
							}))
							.is_err()
							{
								tracing::warn!(component = %component.name(), "after-activation hook panicked");
							}

							result
						})
					})
					.collect();

				handles
					.into_iter()
					.map(|handle| {
						let result = handle
							.join()
							.expect("activation panics are caught inside maybe_activate");
						(result.component().clone(), result)
					})
					.collect()
			});

		Cycle::new(number, results)
	}

	/// Decide whether the run should stop, and with what terminal error
	/// (`None` for natural completion).
	fn must_stop(&self, cycle: &Cycle) -> (bool, Option<Error>) {
		if let Some(err) = &self.error {
			return (true, Some(err.clone()));
		}

		if self
			.config
			.cycles_limit
			.reached(self.runtime_info.cycles().len() as u64)
		{
			return (true, Some(Error::ReachedMaxAllowedCycles));
		}

		if let Some(limit) = self.config.time_limit {
			if self
				.runtime_info
				.elapsed_since_start()
				.is_some_and(|elapsed| elapsed >= limit)
			{
				return (true, Some(Error::TimeLimitExceeded));
			}
		}

		match self.config.error_handling_strategy {
			ErrorHandlingStrategy::StopOnFirstErrorOrPanic => {
				let hit = cycle.results().any(|r| {
					matches!(
						r.outcome(),
						Some(ActivationOutcome::ReturnedError) | Some(ActivationOutcome::Panicked)
					)
				});
				if hit {
					return (
						true,
						Some(Error::HitAnErrorOrPanic {
							cycle: cycle.number(),
						}),
					);
				}
			}
			ErrorHandlingStrategy::StopOnFirstPanic => {
				let hit = cycle
					.results()
					.any(|r| matches!(r.outcome(), Some(ActivationOutcome::Panicked)));
				if hit {
					return (
						true,
						Some(Error::HitAPanic {
							cycle: cycle.number(),
						}),
					);
				}
			}
			ErrorHandlingStrategy::IgnoreAll => {}
		}

		if cycle.activated_none() {
			return (true, None);
		}

		(false, None)
	}
}

//! Before/after-run and per-activation hook registration.

use std::sync::Arc;

use crate::activation::ActivationResult;
use crate::component::Component;
use crate::error::Error;
use crate::mesh::Mesh;
use crate::runtime::RuntimeInfo;

type MeshHook = Arc<dyn Fn(&Mesh) -> Result<(), Error> + Send + Sync>;
type RuntimeHook = Arc<dyn Fn(&RuntimeInfo) + Send + Sync>;
type ComponentHook = Arc<dyn Fn(&Component) + Send + Sync>;
type ComponentErrorHook = Arc<dyn Fn(&Component, &Error) + Send + Sync>;
type ComponentPanicHook = Arc<dyn Fn(&Component, &str) + Send + Sync>;
type ComponentWaitHook = Arc<dyn Fn(&Component, bool) + Send + Sync>;
type ComponentAfterHook = Arc<dyn Fn(&Component, &ActivationResult) + Send + Sync>;

/// Registered hooks for one mesh. Failures in `before_run` abort the run;
/// every other hook's failure has no return value to fail with and is
/// expected to log rather than panic.
#[derive(Default, Clone)]
pub struct MeshHooks {
	before_run: Option<MeshHook>,
	after_run: Option<RuntimeHook>,
	before_activation: Option<ComponentHook>,
	on_success: Option<ComponentHook>,
	on_error: Option<ComponentErrorHook>,
	on_panic: Option<ComponentPanicHook>,
	on_waiting: Option<ComponentWaitHook>,
	after_activation: Option<ComponentAfterHook>,
}

impl MeshHooks {
	pub(crate) fn run_before_run(&self, mesh: &Mesh) -> Result<(), Error> {
		match &self.before_run {
			Some(hook) => hook(mesh),
			None => Ok(()),
		}
	}

	pub(crate) fn run_after_run(&self, info: &RuntimeInfo) {
		if let Some(hook) = &self.after_run {
			hook(info);
		}
	}

	pub(crate) fn run_before_activation(&self, component: &Component) {
		if let Some(hook) = &self.before_activation {
			hook(component);
		}
	}

	pub(crate) fn run_after_activation(&self, component: &Component, result: &ActivationResult) {
		use crate::activation::ActivationOutcome as O;
		match result.outcome() {
			Some(O::Ok) => {
				if let Some(hook) = &self.on_success {
					hook(component);
				}
			}
			Some(O::ReturnedError) | None => {
				if let Some(err) = result.error() {
					if let Some(hook) = &self.on_error {
						hook(component, err);
					}
				}
			}
			Some(O::Panicked) => {
				if let Some(hook) = &self.on_panic {
					let message = result.error().map(ToString::to_string).unwrap_or_default();
					hook(component, &message);
				}
			}
			Some(O::WaitingForInputsKeep) => {
				if let Some(hook) = &self.on_waiting {
					hook(component, true);
				}
			}
			Some(O::WaitingForInputsClear) => {
				if let Some(hook) = &self.on_waiting {
					hook(component, false);
				}
			}
			Some(O::NoInput) | Some(O::NoFunction) => {}
		}
		if let Some(hook) = &self.after_activation {
			hook(component, result);
		}
	}
}

/// Passed by `&mut` into the closure given to `Mesh::setup_hooks`.
#[derive(Default)]
pub struct HooksBuilder {
	hooks: MeshHooks,
}

impl HooksBuilder {
	pub fn before_run<F>(mut self, f: F) -> Self
	where
		F: Fn(&Mesh) -> Result<(), Error> + Send + Sync + 'static,
	{
		self.hooks.before_run = Some(Arc::new(f));
		self
	}

	pub fn after_run<F>(mut self, f: F) -> Self
	where
		F: Fn(&RuntimeInfo) + Send + Sync + 'static,
	{
		self.hooks.after_run = Some(Arc::new(f));
		self
	}

	pub fn before_activation<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component) + Send + Sync + 'static,
	{
		self.hooks.before_activation = Some(Arc::new(f));
		self
	}

	pub fn on_activation_success<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component) + Send + Sync + 'static,
	{
		self.hooks.on_success = Some(Arc::new(f));
		self
	}

	pub fn on_activation_error<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component, &Error) + Send + Sync + 'static,
	{
		self.hooks.on_error = Some(Arc::new(f));
		self
	}

	pub fn on_activation_panic<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component, &str) + Send + Sync + 'static,
	{
		self.hooks.on_panic = Some(Arc::new(f));
		self
	}

	pub fn on_waiting_for_inputs<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component, bool) + Send + Sync + 'static,
	{
		self.hooks.on_waiting = Some(Arc::new(f));
		self
	}

	pub fn after_activation<F>(mut self, f: F) -> Self
	where
		F: Fn(&Component, &ActivationResult) + Send + Sync + 'static,
	{
		self.hooks.after_activation = Some(Arc::new(f));
		self
	}

	pub(crate) fn build(self) -> MeshHooks {
		self.hooks
	}
}

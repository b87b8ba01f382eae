//! A flow-based mesh execution engine.
//!
//! Components are independent units of work, wired together by pipes
//! connecting named ports. Execution proceeds in discrete activation
//! cycles: every component with signals on an input port may activate
//! concurrently; once all activations of a cycle finish, output signals are
//! transported along pipes to their destination input ports, and the next
//! cycle begins. A cycle that activates no component ends the run.
//!
//! ```
//! use fmesh::{Component, Mesh, Signal};
//!
//! let mut echo = Component::new("echo")
//!     .add_inputs(["in"])
//!     .add_outputs(["out"])
//!     .with_activation_func(|ctx| {
//!         let payload = *ctx.input_by_name("in")?.first_payload::<i32>()?.unwrap();
//!         ctx.output_by_name_mut("out")?.put_signals([Signal::new(payload)]);
//!         Ok(())
//!     });
//! echo.input_by_name_mut("in")?.put_signals([Signal::new(7_i32)]);
//!
//! let mesh = Mesh::new("demo").add_components([echo]);
//! let (runtime_info, error) = mesh.run();
//! assert!(error.is_none());
//! // cycle 1: echo activates and emits; cycle 2: no input left, run ends.
//! assert_eq!(runtime_info.cycles().len(), 2);
//! # Ok::<(), fmesh::Error>(())
//! ```

mod activation;
mod component;
mod config;
mod cycle;
mod error;
mod hooks;
mod logger;
mod mesh;
mod port;
mod runtime;
mod signal;
mod state;
mod transport;
mod validation;

pub use activation::{ActivationOutcome, ActivationResult};
pub use component::{ActivationContext, ActivationFn, Component};
pub use config::{CyclesLimit, ErrorHandlingStrategy, MeshConfig};
pub use cycle::Cycle;
pub use error::{Error, Name};
pub use hooks::{HooksBuilder, MeshHooks};
pub use logger::{Logger, NullLogger, TracingLogger};
pub use mesh::Mesh;
pub use port::{Direction, PipeTarget, Port, PortBuffer};
pub use runtime::RuntimeInfo;
pub use signal::Signal;
pub use state::{MapStateBag, StateBag};

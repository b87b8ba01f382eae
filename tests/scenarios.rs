//! End-to-end scenarios and invariants run against the public API only.

use fmesh::{
	ActivationOutcome, Component, Error, ErrorHandlingStrategy, Mesh, MeshConfig, Port, Signal,
};

fn sum_component() -> Component {
	Component::new("s")
		.add_inputs(["i1", "i2"])
		.add_outputs(["o"])
		.with_activation_func(|ctx| {
			let i1 = ctx.input_by_name("i1")?.first_payload::<i32>()?.copied();
			let i2 = ctx.input_by_name("i2")?.first_payload::<i32>()?.copied();
			match (i1, i2) {
				(Some(a), Some(b)) => {
					ctx.output_by_name_mut("o")?.put_signals([Signal::new(a + b)]);
					Ok(())
				}
				_ => Err(Error::wait_keep()),
			}
		})
}

#[test]
fn wait_for_both_inputs_keeps_the_lone_signal() {
	let mut s = sum_component();
	s.input_by_name_mut("i1").unwrap().put_signals([Signal::new(1_i32)]);

	let config = MeshConfig::new().with_cycles_limit(fmesh::CyclesLimit::Limited(1));
	let mesh = Mesh::new_with_config("m", config).add_components([s]);
	let (info, err) = mesh.run();

	assert!(matches!(err, Some(Error::ReachedMaxAllowedCycles)));
	let cycle1 = &info.cycles()[0];
	assert_eq!(
		cycle1.result_for("s").unwrap().outcome(),
		Some(ActivationOutcome::WaitingForInputsKeep)
	);
}

#[test]
fn wait_for_both_inputs_then_sums_once_satisfied() {
	let mut s = sum_component();
	s.input_by_name_mut("i1").unwrap().put_signals([Signal::new(1_i32)]);
	s.input_by_name_mut("i2").unwrap().put_signals([Signal::new(2_i32)]);

	let mesh = Mesh::new("m").add_components([s]);
	let (info, err) = mesh.run();

	assert!(err.is_none());
	let cycle1 = &info.cycles()[0];
	assert_eq!(cycle1.result_for("s").unwrap().outcome(), Some(ActivationOutcome::Ok));
}

#[test]
fn duplicate_pipes_deliver_one_copy_per_pipe() {
	// Two pipes chained on the same output port to the same destination: §4.1
	// says duplicate destinations multiply delivery, one copy per pipe.
	let a_out = Port::new_output("out").pipe_to("c", "in").pipe_to("c", "in");
	let mut a = Component::new("a")
		.add_inputs(["trigger"])
		.attach_output_ports([a_out])
		.with_activation_func(|ctx| {
			ctx.output_by_name_mut("out")?.put_signals([Signal::new(5_i32)]);
			Ok(())
		});
	a.input_by_name_mut("trigger").unwrap().put_signals([Signal::new(0_i32)]);

	let c = Component::new("c").add_inputs(["in"]).with_activation_func(|ctx| {
		let payloads: Vec<i32> = ctx
			.input_by_name("in")?
			.all_signals()
			.iter()
			.map(|s| *s.payload::<i32>().unwrap())
			.collect();
		assert_eq!(payloads, vec![5, 5]);
		Ok(())
	});

	let mesh = Mesh::new("m").add_components([a, c]);
	let (info, err) = mesh.run();
	assert!(err.is_none());

	let cycle2 = &info.cycles()[1];
	assert_eq!(cycle2.result_for("c").unwrap().outcome(), Some(ActivationOutcome::Ok));
}

#[test]
fn fan_in_duplication() {
	let a_out = Port::new_output("out").pipe_to("c", "in");
	let b_out = Port::new_output("out").pipe_to("c", "in");

	let mut a = Component::new("a")
		.add_inputs(["trigger"])
		.attach_output_ports([a_out])
		.with_activation_func(|ctx| {
			ctx.output_by_name_mut("out")?.put_signals([Signal::new(10_i32)]);
			Ok(())
		});
	let mut b = Component::new("b")
		.add_inputs(["trigger"])
		.attach_output_ports([b_out])
		.with_activation_func(|ctx| {
			ctx.output_by_name_mut("out")?.put_signals([Signal::new(20_i32)]);
			Ok(())
		});
	a.input_by_name_mut("trigger").unwrap().put_signals([Signal::new(0_i32)]);
	b.input_by_name_mut("trigger").unwrap().put_signals([Signal::new(0_i32)]);

	let c = Component::new("c").add_inputs(["in"]).with_activation_func(|ctx| {
		let payloads: Vec<i32> = ctx
			.input_by_name("in")?
			.all_signals()
			.iter()
			.map(|s| *s.payload::<i32>().unwrap())
			.collect();
		assert_eq!(payloads.len(), 2);
		assert!(payloads.contains(&10));
		assert!(payloads.contains(&20));
		Ok(())
	});

	let mesh = Mesh::new("m").add_components([a, b, c]);
	let (info, err) = mesh.run();
	assert!(err.is_none());

	let cycle2 = &info.cycles()[1];
	assert_eq!(cycle2.result_for("c").unwrap().outcome(), Some(ActivationOutcome::Ok));
}

#[test]
fn panic_isolation_with_ignore_all() {
	let c2 = Component::new("c2")
		.add_inputs(["in"])
		.with_activation_func(|_| panic!("boom"));
	let c4 = Component::new("c4")
		.add_inputs(["in"])
		.with_activation_func(|_| Ok(()));

	let c1_out = Port::new_output("out").pipe_to("c2", "in");
	let mut c1 = Component::new("c1")
		.add_inputs(["trigger"])
		.attach_output_ports([c1_out])
		.with_activation_func(|ctx| {
			ctx.output_by_name_mut("out")?.put_signals([Signal::new(1_i32)]);
			Ok(())
		});
	let c3_out = Port::new_output("out").pipe_to("c4", "in");
	let mut c3 = Component::new("c3")
		.add_inputs(["trigger"])
		.attach_output_ports([c3_out])
		.with_activation_func(|ctx| {
			ctx.output_by_name_mut("out")?.put_signals([Signal::new(2_i32)]);
			Ok(())
		});

	c1.input_by_name_mut("trigger").unwrap().put_signals([Signal::new(0_i32)]);
	c3.input_by_name_mut("trigger").unwrap().put_signals([Signal::new(0_i32)]);

	let config = MeshConfig::new().with_error_handling_strategy(ErrorHandlingStrategy::IgnoreAll);
	let mesh = Mesh::new_with_config("m", config).add_components([c1, c2, c3, c4]);
	let (info, err) = mesh.run();

	assert!(err.is_none(), "IgnoreAll must not treat a panic as terminal");

	let panicked = info.cycles().iter().any(|c| {
		matches!(
			c.result_for("c2").map(|r| r.outcome()),
			Some(Some(ActivationOutcome::Panicked))
		)
	});
	assert!(panicked, "expected a cycle with c2 Panicked");

	let c4_ok = info.cycles().iter().any(|c| {
		matches!(c.result_for("c4").map(|r| r.outcome()), Some(Some(ActivationOutcome::Ok)))
	});
	assert!(c4_ok, "c4 should proceed normally despite c2's panic");
}

#[test]
fn invariant_every_cycle_has_one_entry_per_component() {
	let a = Component::new("a").add_inputs(["in"]).with_activation_func(|_| Ok(()));
	let b = Component::new("b").with_activation_func(|_| Ok(()));
	let mesh = Mesh::new("m").add_components([a, b]);
	let (info, err) = mesh.run();
	assert!(err.is_none());
	for cycle in info.cycles() {
		assert!(cycle.result_for("a").is_some());
		assert!(cycle.result_for("b").is_some());
	}
}

#[test]
fn validation_failure_runs_zero_cycles() {
	let out = Port::new_output("out").pipe_to("ghost", "in");
	let c1 = Component::new("c1").attach_output_ports([out]);
	let mesh = Mesh::new("m").add_components([c1]);
	let (info, err) = mesh.run();

	assert_eq!(info.cycles().len(), 0);
	assert!(matches!(err, Some(Error::ValidationFailed { .. })));
}

#[test]
fn pipe_leading_to_an_output_port_is_wrong_direction_not_validation_failed() {
	// `c2` exists and has a port named "out", but it's an output port: a
	// pipe ending there is a direction violation, not a dangling reference.
	let out = Port::new_output("out").pipe_to("c2", "out");
	let c1 = Component::new("c1").attach_output_ports([out]);
	let c2 = Component::new("c2").add_outputs(["out"]);
	let mesh = Mesh::new("m").add_components([c1, c2]);
	let (info, err) = mesh.run();

	assert_eq!(info.cycles().len(), 0);
	assert!(matches!(err, Some(Error::WrongPortDirection { .. })));
}

#[test]
fn no_initial_signals_yields_only_no_input_or_no_function() {
	let with_fn = Component::new("a").add_inputs(["in"]).with_activation_func(|_| Ok(()));
	let without_fn = Component::new("b").add_inputs(["in"]);
	let mesh = Mesh::new("m").add_components([with_fn, without_fn]);
	let (info, err) = mesh.run();

	assert!(err.is_none());
	assert_eq!(info.cycles().len(), 1);
	let cycle = &info.cycles()[0];
	assert_eq!(cycle.result_for("a").unwrap().outcome(), Some(ActivationOutcome::NoInput));
	assert_eq!(cycle.result_for("b").unwrap().outcome(), Some(ActivationOutcome::NoFunction));
}

#[test]
fn stop_on_first_panic_halts_on_the_panicking_cycle() {
	let mut c = Component::new("c").add_inputs(["in"]).with_activation_func(|_| panic!("boom"));
	c.input_by_name_mut("in").unwrap().put_signals([Signal::new(1_i32)]);

	let config = MeshConfig::new().with_error_handling_strategy(ErrorHandlingStrategy::StopOnFirstPanic);
	let mesh = Mesh::new_with_config("m", config).add_components([c]);
	let (info, err) = mesh.run();

	assert!(matches!(err, Some(Error::HitAPanic { cycle: 1 })));
	assert_eq!(info.cycles().len(), 1);
	assert_eq!(
		info.cycles()[0].result_for("c").unwrap().outcome(),
		Some(ActivationOutcome::Panicked)
	);
}

#[test]
fn default_strategy_stops_on_first_returned_error() {
	let mut c = Component::new("c")
		.add_inputs(["in"])
		.with_activation_func(|_| Err(Error::NotFound { what: "boom".into() }));
	c.input_by_name_mut("in").unwrap().put_signals([Signal::new(1_i32)]);

	// default config is StopOnFirstErrorOrPanic
	let mesh = Mesh::new("m").add_components([c]);
	let (info, err) = mesh.run();

	assert!(matches!(err, Some(Error::HitAnErrorOrPanic { cycle: 1 })));
	assert_eq!(info.cycles().len(), 1);
	assert_eq!(
		info.cycles()[0].result_for("c").unwrap().outcome(),
		Some(ActivationOutcome::ReturnedError)
	);
}

#[test]
fn waiting_for_inputs_keep_preserves_buffer_contents_across_the_cycle() {
	use std::sync::{Arc, Mutex};

	let mut s = sum_component();
	s.input_by_name_mut("i1").unwrap().put_signals([Signal::new(9_i32)]);

	// Snapshot `i1`'s buffer just before the second activation attempt: since
	// cycle 1 only returns WaitingForInputsKeep, the signal placed before the
	// run must still be sitting there, untouched, for cycle 2 to see.
	let seen_before_second_activation = Arc::new(Mutex::new(None));
	let seen = seen_before_second_activation.clone();
	let calls = Arc::new(Mutex::new(0_u32));

	let config = MeshConfig::new().with_cycles_limit(fmesh::CyclesLimit::Limited(2));
	let mesh = Mesh::new_with_config("m", config)
		.add_components([s])
		.setup_hooks(move |hooks| {
			let seen = seen.clone();
			let calls = calls.clone();
			hooks.before_activation(move |component| {
				let mut n = calls.lock().unwrap();
				*n += 1;
				if *n == 2 {
					let payload = component
						.input_by_name("i1")
						.ok()
						.and_then(|p| p.first_payload::<i32>().ok().flatten())
						.copied();
					*seen.lock().unwrap() = Some(payload);
				}
			})
		});
	let (info, err) = mesh.run();

	assert!(matches!(err, Some(Error::ReachedMaxAllowedCycles)));
	assert_eq!(
		info.cycles()[0].result_for("s").unwrap().outcome(),
		Some(ActivationOutcome::WaitingForInputsKeep)
	);
	assert_eq!(*seen_before_second_activation.lock().unwrap(), Some(Some(9)));
}

#[test]
fn rerunning_with_identical_inputs_reproduces_the_same_outcome_sequence() {
	let run_once = || {
		let a_out = Port::new_output("out").pipe_to("b", "in");
		let mut a = Component::new("a")
			.add_inputs(["in"])
			.attach_output_ports([a_out])
			.with_activation_func(|ctx| {
				let payload = *ctx.input_by_name("in")?.first_payload::<i32>()?.unwrap();
				ctx.output_by_name_mut("out")?.put_signals([Signal::new(payload)]);
				Ok(())
			});
		a.input_by_name_mut("in").unwrap().put_signals([Signal::new(7_i32)]);
		let b = Component::new("b")
			.add_inputs(["in"])
			.add_outputs(["out"])
			.with_activation_func(|ctx| {
				let payload = *ctx.input_by_name("in")?.first_payload::<i32>()?.unwrap();
				ctx.output_by_name_mut("out")?.put_signals([Signal::new(payload)]);
				Ok(())
			});
		let mesh = Mesh::new("m").add_components([a, b]);
		let (info, err) = mesh.run();
		assert!(err.is_none());
		info.cycles()
			.iter()
			.map(|c| {
				(
					c.result_for("a").unwrap().outcome(),
					c.result_for("b").unwrap().outcome(),
				)
			})
			.collect::<Vec<_>>()
	};

	assert_eq!(run_once(), run_once());
}

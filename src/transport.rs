//! The per-cycle flush/clear policy engine.

use std::collections::BTreeMap;

use crate::activation::ActivationOutcome;
use crate::component::Component;
use crate::cycle::Cycle;
use crate::error::{Error, Name};

/// Whether a component's outputs get flushed to pipes and whether its own
/// inputs get cleared, keyed by its activation outcome.
fn policy(outcome: Option<ActivationOutcome>) -> (bool, bool) {
	use ActivationOutcome as O;
	match outcome {
		Some(O::Ok) => (true, true),
		Some(O::ReturnedError) => (true, true),
		Some(O::Panicked) => (true, true),
		Some(O::WaitingForInputsClear) => (false, true),
		Some(O::WaitingForInputsKeep) => (false, false),
		Some(O::NoInput) => (false, false),
		Some(O::NoFunction) => (false, false),
		// Defensive chain-error state: nothing to flush or clear.
		None => (false, false),
	}
}

/// Drive the transport step for one finished cycle: flush eligible
/// components' outputs to their pipes' destinations, then clear eligible
/// components' inputs. Sequential by construction.
pub(crate) fn transport_step(
	components: &mut [Component],
	name_index: &BTreeMap<Name, usize>,
	cycle: &Cycle,
) -> Result<(), Error> {
	let mut deliveries: Vec<(usize, Name, crate::signal::Signal)> = Vec::new();
	let mut to_clear: Vec<usize> = Vec::new();

	for (idx, component) in components.iter_mut().enumerate() {
		let Some(result) = cycle.result_for(component.name().as_str()) else {
			continue;
		};
		let (flush, clear) = policy(result.outcome());

		if flush {
			for (_, port) in component.outputs_mut() {
				let signals = port.buffer_mut().drain_all();
				if signals.is_empty() {
					continue;
				}
				for target in port.pipes() {
					let Some(&dst_idx) = name_index.get(target.component.as_str()) else {
						return Err(Error::validation_failed(format!(
							"pipe leads to absent component `{}`",
							target.component
						)));
					};
					for signal in &signals {
						deliveries.push((dst_idx, target.port.clone(), signal.clone()));
					}
				}
			}
		}

		if clear {
			to_clear.push(idx);
		}
	}

	// Clear before delivering: a self-loop pipe both clears and re-feeds the
	// same component's input in one transport step, and the freshly
	// delivered signal must survive the clear.
	for idx in to_clear {
		components[idx].clear_inputs();
	}

	for (dst_idx, port_name, signal) in deliveries {
		components[dst_idx]
			.input_by_name_mut(port_name.as_str())
			.map_err(|_| {
				Error::validation_failed(format!(
					"pipe leads to a non-existent input port `{port_name}`"
				))
			})?
			.put_signals([signal]);
	}

	Ok(())
}

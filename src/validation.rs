//! Pre-run structural validation.

use crate::error::Error;
use crate::mesh::Mesh;
use crate::port::Direction;

/// Walk the component registry and verify every structural invariant before
/// the first cycle runs. Returns the first defect found, wrapped as
/// `ValidationFailed`.
pub(crate) fn validate(mesh: &Mesh) -> Result<(), Error> {
	for component in mesh.components() {
		if let Some(err) = component.chain_error() {
			return Err(Error::validation_failed(format!(
				"component `{}` carries a chain error: {err}",
				component.name()
			)));
		}
		match component.parent_mesh() {
			Some(parent) if parent.as_str() == mesh.name().as_str() => {}
			_ => {
				return Err(Error::validation_failed(format!(
					"component `{}` does not belong to this mesh",
					component.name()
				)));
			}
		}

		for (_, port) in component.inputs().chain(component.outputs()) {
			if let Some(err) = port.chain_error() {
				return Err(Error::validation_failed(format!(
					"port `{}` on component `{}` carries a chain error: {err}",
					port.name(),
					component.name()
				)));
			}
		}

		for (_, port) in component.outputs() {
			for target in port.pipes() {
				let Some(dst_component) = mesh.component_by_name(target.component.as_str()) else {
					return Err(Error::validation_failed(format!(
						"pipe from `{}.{}` leads to absent component `{}`",
						component.name(),
						port.name(),
						target.component,
					)));
				};
				if dst_component.parent_mesh().map(|p| p.as_str()) != Some(mesh.name().as_str()) {
					return Err(Error::validation_failed(format!(
						"pipe destination component `{}` does not belong to this mesh",
						target.component,
					)));
				}
				match dst_component.input_by_name(target.port.as_str()) {
					Ok(dst_port) if dst_port.direction() == Direction::Input => {}
					_ => {
						if dst_component.output_by_name(target.port.as_str()).is_ok() {
							return Err(Error::wrong_direction(format!(
								"pipe from `{}.{}` leads to `{}.{}`, which is an output port",
								component.name(),
								port.name(),
								target.component,
								target.port,
							)));
						}
						return Err(Error::validation_failed(format!(
							"pipe from `{}.{}` leads to a non-existent input port `{}.{}`",
							component.name(),
							port.name(),
							target.component,
							target.port,
						)));
					}
				}
			}
		}
	}
	Ok(())
}

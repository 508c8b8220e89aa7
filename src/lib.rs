pub mod constants;
pub mod kepler;
pub mod orbit_type;
pub mod propagation;
pub mod ref_system;
pub mod sgprop_errors;
pub mod time;

pub use orbit_type::orbital_elements::OrbitalElements;
pub use propagation::{propagate, ModelOutput, PropagationParams, Propagator};
pub use sgprop_errors::SgpropError;

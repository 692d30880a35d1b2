pub mod aerodynamics;
pub mod propulsion;
pub mod wind;

pub use aerodynamics::{drag_force, effective_drag, DragProfile};
pub use propulsion::{mass_flow, specific_impulse};
pub use wind::recommended_launch_angle;

//! Controller layer: UI events and command orchestration around the shared form controller.

pub mod events;
pub mod orchestration;

//! Controller layer: worker events, error modeling, and command orchestration.

pub mod events;
pub mod orchestration;

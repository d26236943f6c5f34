//! Index lifecycle management.
//!
//! Rotation builds a fresh physical index next to the live one and moves the
//! alias over in a single atomic update, so searches never see a missing index.

mod controller;

pub use controller::{IndexLifecycleController, PublishOrder, RotationReport};

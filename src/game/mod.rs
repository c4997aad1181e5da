pub mod color;
pub mod curve;
pub mod engine;
pub mod round;

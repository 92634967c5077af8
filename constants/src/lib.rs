/// Shared constants for the panel survey pipeline.
pub mod class;
pub mod coordinate_system;
pub mod survey;

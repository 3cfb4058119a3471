pub mod analysis;
pub mod pitch;

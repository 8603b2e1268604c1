pub mod actions;
pub mod context;
pub mod data;
pub mod haul;
pub mod jobsystem;
pub mod mine;
pub mod utility;

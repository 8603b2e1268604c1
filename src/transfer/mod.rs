pub mod generator;
pub mod grow;
pub mod task;
pub mod transfersystem;

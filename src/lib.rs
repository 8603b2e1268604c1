#![warn(clippy::all)]

pub mod features;
pub mod game_loop;
pub mod jobs;
pub mod logging;
pub mod machine_tick;
pub mod memorysystem;
pub mod position;
pub mod serialize;
pub mod store;
pub mod transfer;
pub mod world;

pub fn setup() {
    logging::setup_logging(logging::Info);
}

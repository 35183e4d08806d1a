pub mod devices;
pub mod interactive;
pub mod log;
pub mod setup;

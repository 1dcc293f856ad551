//! Platform abstraction layer
//!
//! Everything between the simulation and a host:
//! - Time/ticks (`TickSource`, deterministic `VirtualClock`)
//! - Input events (key names to move commands, scripted input)
//! - The driver that feeds timer ticks and commands to a session and routes
//!   its outbound traffic to audio, render and event consumers

pub mod clock;
pub mod driver;
pub mod input;

pub use clock::{TickSource, VirtualClock};
pub use driver::Driver;
pub use input::{InputScript, command_for_key};

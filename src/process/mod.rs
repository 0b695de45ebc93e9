//! External process plumbing: running-state checks and launching

pub mod gate;
pub mod launcher;

pub use gate::ProcessGate;
pub use launcher::{ExecutablePath, LaunchResult, ProcessDescriptor, ProcessLauncher};

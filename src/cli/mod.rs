/// CLI Indexes: Inference devices
pub mod device;

/// Interactive input
pub mod prompt;

pub use device::Device;

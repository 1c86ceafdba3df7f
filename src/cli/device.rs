use std::fmt::Display;

/// The unique string token for CPU inference
pub static CPU: &str = "cpu";

/// The unique string token for CUDA inference
pub static CUDA: &str = "cuda";

/// Where to run inference
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Device {
    /// The CPU, using the ndarray backend
    Cpu,

    /// A CUDA GPU by index, using the LibTorch backend
    Cuda(usize),
}

impl TryFrom<&str> for Device {
    type Error = DeviceError;

    /// Parse "cpu", "cuda" or "cuda:N"
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().to_lowercase();

        if value == CPU {
            return Ok(Device::Cpu);
        }

        if value == CUDA {
            return Ok(Device::Cuda(0));
        }

        value
            .strip_prefix(CUDA)
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(|index| index.parse().ok())
            .map(Device::Cuda)
            .ok_or(DeviceError::Unknown(value))
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "{}", CPU),
            Device::Cuda(index) => write!(f, "{}:{}", CUDA, index),
        }
    }
}

/// Device Error
#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    /// No device found for the given string
    #[error("no device found for {0}")]
    Unknown(String),
}

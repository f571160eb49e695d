use std::{fmt::Display, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::wrapper::Acceleration;

/// Device the wrapper runs on.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    #[default]
    Cuda,
    Mps,
}

impl Device {
    pub fn is_accelerator(&self) -> bool {
        !matches!(self, Self::Cpu)
    }
}

serde_plain::derive_display_from_serialize!(Device);

#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
/// DType for the model.
///
/// Note: When using `Auto`, the pattern is: F16 on an accelerator, F32 on CPU.
pub enum ModelDType {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "bf16")]
    BF16,
    #[serde(rename = "f16")]
    F16,
    #[serde(rename = "f32")]
    F32,
}

impl Display for ModelDType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::BF16 => write!(f, "bf16"),
            Self::F16 => write!(f, "f16"),
            Self::F32 => write!(f, "f32"),
        }
    }
}

impl ModelDType {
    /// Pick a concrete dtype for `device`. Never returns `Auto`.
    pub fn resolve(&self, device: Device) -> ModelDType {
        let dtype = match self {
            Self::Auto if device.is_accelerator() => Self::F16,
            Self::Auto => Self::F32,
            Self::BF16 | Self::F16 if !device.is_accelerator() => {
                warn!("{self} on {device} is slow and may be unsupported by the wrapper.");
                *self
            }
            other => *other,
        };
        info!("dtype selected is {dtype}.");
        dtype
    }
}

/// Process-level arguments handed to the pipeline constructor.
#[derive(Debug, Clone, clap::Args)]
pub struct RuntimeArgs {
    /// Use the tiny autoencoder (TAESD) for faster decoding.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub taesd: bool,

    /// Acceleration backend used by the wrapper.
    #[arg(long, default_value_t = Acceleration::Xformers)]
    pub acceleration: Acceleration,

    /// Run the safety checker on every output frame.
    #[arg(long)]
    pub safety_checker: bool,

    /// Directory for compiled acceleration engines.
    #[arg(long, default_value = "engines")]
    pub engine_dir: PathBuf,

    /// Device to run on.
    #[arg(long, default_value_t = Device::Cuda)]
    pub device: Device,

    /// Model precision. `auto` picks based on the device.
    #[arg(long, default_value_t = ModelDType::Auto)]
    pub dtype: ModelDType,
}

impl Default for RuntimeArgs {
    fn default() -> Self {
        Self {
            taesd: true,
            acceleration: Acceleration::Xformers,
            safety_checker: false,
            engine_dir: PathBuf::from("engines"),
            device: Device::Cuda,
            dtype: ModelDType::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_device() {
        assert_eq!(ModelDType::Auto.resolve(Device::Cuda), ModelDType::F16);
        assert_eq!(ModelDType::Auto.resolve(Device::Mps), ModelDType::F16);
        assert_eq!(ModelDType::Auto.resolve(Device::Cpu), ModelDType::F32);
    }

    #[test]
    fn explicit_dtype_passes_through() {
        assert_eq!(ModelDType::BF16.resolve(Device::Cuda), ModelDType::BF16);
        assert_eq!(ModelDType::F16.resolve(Device::Cpu), ModelDType::F16);
        assert_eq!(ModelDType::F32.resolve(Device::Cuda), ModelDType::F32);
    }

    #[test]
    fn device_string_form() {
        assert_eq!(Device::Cuda.to_string(), "cuda");
        assert_eq!(Device::Mps.to_string(), "mps");
    }
}

use std::path::PathBuf;

use anyhow::Result;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::{
    args::{Device, ModelDType},
    tensor::ImageTensor,
};

/// Acceleration backend used by the wrapper for the denoising network.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Acceleration {
    None,
    #[default]
    Xformers,
    Tensorrt,
}

/// Generation mode of the wrapper.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Img2Img,
    Txt2Img,
}

/// Classifier-free guidance strategy.
///
/// - None: no guidance, one UNet pass per step.
/// - Full: conditional and unconditional passes for every step.
/// - SelfNegative: reuse the stream's own noise prediction as the negative branch.
/// - Initialize: compute the unconditional branch once at prepare time.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CfgType {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "self")]
    SelfNegative,
    #[serde(rename = "initialize")]
    Initialize,
}

/// Form of the wrapper's output.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Pil,
    Pt,
    Np,
    Latent,
}

serde_plain::derive_display_from_serialize!(Acceleration);
serde_plain::derive_fromstr_from_deserialize!(Acceleration);
serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);
serde_plain::derive_display_from_serialize!(CfgType);
serde_plain::derive_fromstr_from_deserialize!(CfgType);
serde_plain::derive_display_from_serialize!(OutputType);
serde_plain::derive_fromstr_from_deserialize!(OutputType);

/// Construction options of a streaming diffusion wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperConfig {
    pub model_id_or_path: String,
    pub use_tiny_vae: bool,
    pub device: Device,
    pub dtype: ModelDType,
    /// Indices into the scheduler's timesteps that the stream denoises at.
    pub t_index_list: Vec<usize>,
    pub frame_buffer_size: usize,
    pub width: u32,
    pub height: u32,
    pub use_lcm_lora: bool,
    pub output_type: OutputType,
    pub warmup: usize,
    pub vae_id: Option<String>,
    pub acceleration: Acceleration,
    pub mode: Mode,
    pub use_denoising_batch: bool,
    pub cfg_type: CfgType,
    pub use_safety_checker: bool,
    pub enable_similar_image_filter: bool,
    pub similar_image_filter_threshold: f64,
    pub engine_dir: PathBuf,
}

/// Arguments of the one-time prompt and scheduler setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareParams {
    pub prompt: String,
    pub negative_prompt: String,
    pub num_inference_steps: usize,
    pub guidance_scale: f64,
}

/// A loaded streaming diffusion wrapper.
pub trait StreamWrapper: Send {
    /// Resolution the wrapper was built for, as `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// Turn a raw frame into the tensor form `generate` expects.
    fn preprocess_image(&self, image: &DynamicImage) -> Result<ImageTensor> {
        let (width, height) = self.resolution();
        Ok(ImageTensor::from_image(image, width, height)?)
    }

    fn prepare(&mut self, params: &PrepareParams) -> Result<()>;

    /// Run one streaming step on `image` conditioned on `prompt`.
    fn generate(&mut self, image: ImageTensor, prompt: &str) -> Result<DynamicImage>;
}

/// Builds a wrapper from its construction options. Expected to be expensive.
pub trait WrapperLoader {
    fn name(&self) -> &'static str;
    fn load(&self, config: &WrapperConfig) -> Result<Box<dyn StreamWrapper>>;
}

use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use image::DynamicImage;
use tracing::{debug, info};

use crate::{
    args::{Device, ModelDType, RuntimeArgs},
    info::Info,
    params::{InputParams, DEFAULT_NEGATIVE_PROMPT, DEFAULT_PROMPT},
    wrapper::{
        CfgType, Mode, OutputType, PrepareParams, StreamWrapper, WrapperConfig, WrapperLoader,
    },
};

/// Hub id of the default checkpoint. Hosts with a local checkpoint (e.g. a
/// `.safetensors` file) pass their own path through their `WrapperLoader`.
pub const BASE_MODEL: &str = "stabilityai/sd-turbo";
pub const T_INDEX_LIST: [usize; 2] = [35, 45];
pub const FRAME_BUFFER_SIZE: usize = 1;
pub const WARMUP_STEPS: usize = 10;
pub const SIMILAR_IMAGE_FILTER_THRESHOLD: f64 = 0.98;
pub const NUM_INFERENCE_STEPS: usize = 50;
pub const GUIDANCE_SCALE: f64 = 1.2;

impl WrapperConfig {
    /// The fixed img2img configuration, with the runtime-dependent options taken from `args`.
    pub fn for_args(args: &RuntimeArgs, device: Device, dtype: ModelDType) -> Self {
        let params = InputParams::default();
        Self {
            model_id_or_path: BASE_MODEL.to_string(),
            use_tiny_vae: args.taesd,
            device,
            dtype,
            t_index_list: T_INDEX_LIST.to_vec(),
            frame_buffer_size: FRAME_BUFFER_SIZE,
            width: params.width,
            height: params.height,
            use_lcm_lora: false,
            output_type: OutputType::Pil,
            warmup: WARMUP_STEPS,
            vae_id: None,
            acceleration: args.acceleration,
            mode: Mode::Img2Img,
            use_denoising_batch: true,
            cfg_type: CfgType::None,
            use_safety_checker: args.safety_checker,
            enable_similar_image_filter: true,
            similar_image_filter_threshold: SIMILAR_IMAGE_FILTER_THRESHOLD,
            engine_dir: args.engine_dir.clone(),
        }
    }
}

impl PrepareParams {
    fn defaults() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            num_inference_steps: NUM_INFERENCE_STEPS,
            guidance_scale: GUIDANCE_SCALE,
        }
    }
}

/// One frame handed over by the host server.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub image: DynamicImage,
    pub prompt: String,
}

impl FrameInput {
    pub fn new(image: DynamicImage, params: &InputParams) -> Self {
        Self {
            image,
            prompt: params.prompt.clone(),
        }
    }
}

/// The img2img demo pipeline: a configured wrapper plus the metadata the host UI reads.
pub struct Pipeline {
    stream: Mutex<Box<dyn StreamWrapper>>,
    config: WrapperConfig,
    last_prompt: Mutex<String>,
}

impl Pipeline {
    pub fn info() -> Info {
        Info::default()
    }

    pub fn input_params() -> InputParams {
        InputParams::default()
    }

    /// Load the wrapper and prepare it with the default prompts.
    ///
    /// This is expensive (model load, engine compilation) and should happen once per process.
    pub fn new(args: &RuntimeArgs, loader: &dyn WrapperLoader) -> Result<Self> {
        let dtype = args.dtype.resolve(args.device);
        let config = WrapperConfig::for_args(args, args.device, dtype);
        info!(
            "loading `{}` with the {} wrapper on {}, acceleration {}.",
            config.model_id_or_path,
            loader.name(),
            config.device,
            config.acceleration
        );

        let mut stream = loader.load(&config)?;
        let prepare = PrepareParams::defaults();
        stream.prepare(&prepare)?;
        info!(
            "wrapper prepared: {} steps, t_index_list {:?}, guidance {}.",
            prepare.num_inference_steps, config.t_index_list, prepare.guidance_scale
        );

        Ok(Self {
            stream: Mutex::new(stream),
            config,
            last_prompt: Mutex::new(prepare.prompt),
        })
    }

    /// Run one frame through the wrapper and return its output unchanged.
    pub fn predict(&self, input: &FrameInput) -> Result<DynamicImage> {
        let mut stream = lock(&self.stream)?;
        let image = stream.preprocess_image(&input.image)?;
        debug!(
            "frame {}x{} -> tensor {:?}",
            input.image.width(),
            input.image.height(),
            image.dims4()
        );
        let output = stream.generate(image, &input.prompt)?;
        *lock(&self.last_prompt)? = input.prompt.clone();
        Ok(output)
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub fn last_prompt(&self) -> Result<String> {
        Ok(lock(&self.last_prompt)?.clone())
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow::anyhow!("pipeline lock poisoned by a failed frame"))
}

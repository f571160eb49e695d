//! Core crate of stream_img2img: the real-time image-to-image demo pipeline.
//!
//! The pipeline configures a streaming diffusion wrapper once and then feeds it frames.
//! The wrapper itself is supplied by the host through [`WrapperLoader`].
//!
//! ```rust,no_run
//! use stream_img2img_core::{FrameInput, Pipeline, RuntimeArgs, WrapperLoader};
//!
//! # fn run(loader: &dyn WrapperLoader) -> anyhow::Result<()> {
//! let pipeline = Pipeline::new(&RuntimeArgs::default(), loader)?;
//!
//! let frame = image::open("frame.png")?;
//! let output = pipeline.predict(&FrameInput::new(frame, &Pipeline::input_params()))?;
//!
//! output.save("out.png")?;
//! # Ok(())
//! # }
//! ```

mod args;
mod info;
mod params;
mod pipeline;
mod tensor;
mod wrapper;

pub use args::{Device, ModelDType, RuntimeArgs};
pub use info::{Info, PAGE_CONTENT};
pub use params::{
    FieldSchema, InputParams, DEFAULT_HEIGHT, DEFAULT_NEGATIVE_PROMPT, DEFAULT_PROMPT,
    DEFAULT_WIDTH,
};
pub use pipeline::{
    FrameInput, Pipeline, BASE_MODEL, FRAME_BUFFER_SIZE, GUIDANCE_SCALE, NUM_INFERENCE_STEPS,
    SIMILAR_IMAGE_FILTER_THRESHOLD, T_INDEX_LIST, WARMUP_STEPS,
};
pub use tensor::{ImageTensor, TensorError};
pub use wrapper::{
    Acceleration, CfgType, Mode, OutputType, PrepareParams, StreamWrapper, WrapperConfig,
    WrapperLoader,
};

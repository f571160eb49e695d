use clap::{Parser, Subcommand};
use serde_json::json;
use stream_img2img_core::{Info, InputParams, Pipeline, RuntimeArgs, WrapperConfig};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the pipeline metadata shown by the host UI.
    Info,

    /// Print the JSON schemas of the metadata and of the per-request parameters.
    Schema,

    /// Print the wrapper configuration the pipeline would be constructed with.
    Config {
        #[command(flatten)]
        runtime: RuntimeArgs,
    },
}

#[derive(Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let out = match args.command {
        Command::Info => serde_json::to_value(Pipeline::info())?,
        Command::Schema => json!({
            "info": Info::schema(),
            "input_params": InputParams::schema()?,
        }),
        Command::Config { runtime } => {
            let dtype = runtime.dtype.resolve(runtime.device);
            let config = WrapperConfig::for_args(&runtime, runtime.device, dtype);
            info!(
                "{} frames of {}x{} per step.",
                config.frame_buffer_size, config.width, config.height
            );
            serde_json::to_value(config)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

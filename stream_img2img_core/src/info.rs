use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PAGE_CONTENT: &str = r#"<h1 class="text-3xl font-bold">StreamDiffusion</h1>
<h3 class="text-xl font-bold">Image-to-Image SD-Turbo</h3>
<p class="text-sm">
    This demo showcases
    <a
    href="https://github.com/cumulo-autumn/StreamDiffusion"
    target="_blank"
    class="text-blue-500 underline hover:no-underline">StreamDiffusion
</a>
Image to Image pipeline using
    <a
    href="https://huggingface.co/stabilityai/sd-turbo"
    target="_blank"
    class="text-blue-500 underline hover:no-underline">SD-Turbo</a
    > with a MJPEG stream server.
</p>
"#;

/// Static metadata describing the pipeline to the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    pub input_mode: String,
    pub page_content: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            name: "StreamDiffusion img2img".to_string(),
            input_mode: "image".to_string(),
            page_content: PAGE_CONTENT.to_string(),
        }
    }
}

impl Info {
    pub fn schema() -> Value {
        let Info {
            name,
            input_mode,
            page_content,
        } = Info::default();
        json!({
            "title": "Info",
            "type": "object",
            "properties": {
                "name": { "title": "Name", "type": "string", "default": name },
                "input_mode": { "title": "Input Mode", "type": "string", "default": input_mode },
                "page_content": { "title": "Page Content", "type": "string", "default": page_content }
            }
        })
    }
}

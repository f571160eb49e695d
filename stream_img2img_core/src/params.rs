use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PROMPT: &str = "
cgmech, (realistic) solo, white mecha robot, cape, science fiction, torn clothes, glowing, standing, robot joints, mecha, armor, cowboy shot, (floating cape), intense sunlight, silver dragonborn, outdoors, landscape, nature , ((masterpiece, best quality)), <lora:cgmechmix_offset:1><lora:more_details:0.3> <lora:Niji:0.5><lora:dragonborn_offset:0.7> , volumetrics dtx, (film grain, blurry background, blurry foreground, bokeh, depth of field, motion blur:1.3)
";

pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "black and white, blurry, low resolution, pixelated,  pixel art, low quality, low fidelity";

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

/// How the host UI should render and constrain one field. Nothing here is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldSchema {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub default: Value,
    pub id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,
}

/// Per-request fields the host UI lets the user tune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl InputParams {
    /// UI metadata for each field, in display order.
    pub fn fields() -> Vec<(&'static str, FieldSchema)> {
        vec![
            (
                "prompt",
                FieldSchema {
                    title: "Prompt",
                    kind: "string",
                    default: Value::from(DEFAULT_PROMPT),
                    id: "prompt",
                    field: Some("textarea"),
                    ..Default::default()
                },
            ),
            (
                "width",
                FieldSchema {
                    title: "Width",
                    kind: "integer",
                    default: Value::from(DEFAULT_WIDTH),
                    id: "width",
                    min: Some(2),
                    max: Some(15),
                    disabled: true,
                    hide: true,
                    ..Default::default()
                },
            ),
            (
                "height",
                FieldSchema {
                    title: "Height",
                    kind: "integer",
                    default: Value::from(DEFAULT_HEIGHT),
                    id: "height",
                    min: Some(2),
                    max: Some(15),
                    disabled: true,
                    hide: true,
                    ..Default::default()
                },
            ),
        ]
    }

    /// JSON schema consumed by the host UI to render the controls.
    pub fn schema() -> serde_json::Result<Value> {
        let mut properties = Map::new();
        for (name, field) in Self::fields() {
            properties.insert(name.to_string(), serde_json::to_value(field)?);
        }
        let mut schema = Map::new();
        schema.insert("title".to_string(), Value::from("InputParams"));
        schema.insert("type".to_string(), Value::from("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        Ok(Value::Object(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_literals() {
        let params = InputParams::default();
        assert_eq!(
            params.prompt,
            concat!(
                "\ncgmech, (realistic) solo, white mecha robot, cape, science fiction, ",
                "torn clothes, glowing, standing, robot joints, mecha, armor, cowboy shot, ",
                "(floating cape), intense sunlight, silver dragonborn, outdoors, landscape, ",
                "nature , ((masterpiece, best quality)), ",
                "<lora:cgmechmix_offset:1><lora:more_details:0.3> <lora:Niji:0.5>",
                "<lora:dragonborn_offset:0.7> , volumetrics dtx, (film grain, ",
                "blurry background, blurry foreground, bokeh, depth of field, ",
                "motion blur:1.3)\n",
            )
        );
        assert_eq!(params.width, 512);
        assert_eq!(params.height, 512);
        assert_eq!(
            DEFAULT_NEGATIVE_PROMPT,
            "black and white, blurry, low resolution, pixelated,  pixel art, low quality, low fidelity"
        );
    }

    #[test]
    fn size_fields_are_disabled_and_hidden() -> anyhow::Result<()> {
        let schema = InputParams::schema()?;
        for key in ["width", "height"] {
            let field = &schema["properties"][key];
            assert_eq!(field["default"], 512);
            assert_eq!(field["disabled"], true);
            assert_eq!(field["hide"], true);
            assert_eq!(field["min"], 2);
            assert_eq!(field["max"], 15);
            assert_eq!(field["type"], "integer");
        }
        let prompt = &schema["properties"]["prompt"];
        assert_eq!(prompt["field"], "textarea");
        assert_eq!(prompt["title"], "Prompt");
        assert!(prompt.get("disabled").is_none());
        Ok(())
    }

    #[test]
    fn schema_keeps_display_order() -> anyhow::Result<()> {
        let schema = InputParams::schema()?;
        let keys = schema["properties"]
            .as_object()
            .map(|props| props.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(keys, ["prompt", "width", "height"]);

        let order = InputParams::fields()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(keys, order);
        Ok(())
    }

    #[test]
    fn missing_fields_take_defaults() -> anyhow::Result<()> {
        let params: InputParams = serde_json::from_str(r#"{"prompt": "a cat"}"#)?;
        assert_eq!(params.prompt, "a cat");
        assert_eq!(params.width, 512);

        // range metadata is not enforced
        let params: InputParams = serde_json::from_str(r#"{"width": 1024}"#)?;
        assert_eq!(params.width, 1024);
        assert_eq!(params.prompt, DEFAULT_PROMPT);
        Ok(())
    }
}

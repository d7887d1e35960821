use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: [Content<'a>; 1],
    pub generation_config: GenerationConfig,
}

#[derive(Serialize)]
pub struct Content<'a> {
    pub parts: [Part<'a>; 1],
}

#[derive(Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Sampling is pinned for maximum creativity and long answers.
pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 1.0,
    top_p: 0.95,
    top_k: 64,
    max_output_tokens: 8192,
};

impl<'a> GenerateContentRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GENERATION_CONFIG,
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<ContentResponse>,
}

#[derive(Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
pub struct PartResponse {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    pub fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Serialize)]
pub struct PredictRequest<'a> {
    pub instances: [Instance<'a>; 1],
    pub parameters: Parameters,
}

#[derive(Serialize)]
pub struct Instance<'a> {
    pub prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub sample_count: u8,
}

impl<'a> PredictRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            instances: [Instance { prompt }],
            parameters: Parameters { sample_count: 1 },
        }
    }
}

#[derive(Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
}

impl PredictResponse {
    pub fn into_first_payload(self) -> Option<String> {
        self.predictions.into_iter().next()?.bytes_base64_encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_request_matches_wire_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new("hello")).unwrap();
        assert_eq!(body["contents"], json!([{ "parts": [{ "text": "hello" }] }]));

        let config = &body["generationConfig"];
        assert_eq!(config["temperature"].as_f64(), Some(1.0));
        assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(config["topK"], 64);
        assert_eq!(config["maxOutputTokens"], 8192);
    }

    #[test]
    fn image_request_matches_wire_shape() {
        let body = serde_json::to_value(PredictRequest::new("a cat")).unwrap();
        assert_eq!(
            body,
            json!({ "instances": [{ "prompt": "a cat" }], "parameters": { "sampleCount": 1 } })
        );
    }

    #[test]
    fn first_text_needs_every_level() {
        let empty: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [] } }] }))
                .unwrap();
        assert_eq!(empty.into_first_text(), None);

        let missing: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": {} })).unwrap();
        assert_eq!(missing.into_first_text(), None);
    }
}

use serde_json::Value;

use crate::foundation::error::SceneforgeResult;

/// Which external generator a node wants to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Text,
    Image,
    Video,
    Voice,
}

/// One generation call, keyed by the requesting node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub node_id: String,
    pub kind: GenerationKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl GenerationRequest {
    pub fn new(node_id: impl Into<String>, kind: GenerationKind, prompt: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            kind,
            prompt: prompt.into(),
            params: Value::Null,
        }
    }
}

/// What a generator eventually hands back.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationOutcome {
    Url(String),
    Text(String),
}

/// Contract for the text/image/video/voice collaborators. The core only
/// needs `request -> eventually (result | failure)`; transport, retries,
/// and credentials live outside.
pub trait GenerationService {
    fn request(&mut self, request: &GenerationRequest) -> SceneforgeResult<GenerationOutcome>;
}

/// Deterministic stand-in for the real services: canned text, stable
/// placeholder URLs, and a record of everything requested.
#[derive(Clone, Debug, Default)]
pub struct MockGenerationService {
    requests: Vec<GenerationRequest>,
}

impl MockGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[GenerationRequest] {
        &self.requests
    }
}

impl GenerationService for MockGenerationService {
    fn request(&mut self, request: &GenerationRequest) -> SceneforgeResult<GenerationOutcome> {
        self.requests.push(request.clone());
        let outcome = match request.kind {
            GenerationKind::Text => GenerationOutcome::Text(format!(
                "Generated copy for: {}",
                request.prompt
            )),
            GenerationKind::Image => GenerationOutcome::Url(format!(
                "https://assets.invalid/image/{}.png",
                request.node_id
            )),
            GenerationKind::Video => GenerationOutcome::Url(format!(
                "https://assets.invalid/video/{}.mp4",
                request.node_id
            )),
            GenerationKind::Voice => GenerationOutcome::Url(format!(
                "https://assets.invalid/voice/{}.mp3",
                request.node_id
            )),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_answers_are_stable_per_node() {
        let mut svc = MockGenerationService::new();
        let req = GenerationRequest::new("7", GenerationKind::Image, "a foggy harbor");
        let a = svc.request(&req).unwrap();
        let b = svc.request(&req).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            GenerationOutcome::Url("https://assets.invalid/image/7.png".to_string())
        );
        assert_eq!(svc.requests().len(), 2);
    }

    #[test]
    fn text_requests_return_text() {
        let mut svc = MockGenerationService::new();
        let out = svc
            .request(&GenerationRequest::new("3", GenerationKind::Text, "logline"))
            .unwrap();
        assert!(matches!(out, GenerationOutcome::Text(t) if t.contains("logline")));
    }
}

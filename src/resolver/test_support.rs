// Scripted fakes shared by the resolver tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::errors::ResolveError;
use super::extractors::{ExtractionRequest, MediaExtractor};
use super::models::ExtractedMedia;

/// Replays queued answers in order and records the formats it was asked for
pub(crate) struct ScriptedExtractor {
    answers: Mutex<VecDeque<Result<ExtractedMedia, ResolveError>>>,
    seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedExtractor {
    pub(crate) fn new(answers: Vec<Result<Value, &str>>) -> Self {
        let answers = answers
            .into_iter()
            .map(|a| match a {
                Ok(json) => Ok(ExtractedMedia::from_json(&json)),
                Err(msg) => Err(ResolveError::from(msg)),
            })
            .collect();

        Self {
            answers: Mutex::new(answers),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn formats_seen(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaExtractor for ScriptedExtractor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn extract(
        &self,
        _content_id: &str,
        request: &ExtractionRequest,
    ) -> Result<ExtractedMedia, ResolveError> {
        self.seen
            .lock()
            .unwrap()
            .push(request.format.as_ref().map(|f| f.to_string()));

        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ResolveError::Unknown("script exhausted".to_string())))
    }
}

// Lets a chain own a backend while the test keeps counting its calls
#[async_trait]
impl MediaExtractor for Arc<ScriptedExtractor> {
    fn name(&self) -> &'static str {
        "scripted-shared"
    }

    async fn extract(
        &self,
        content_id: &str,
        request: &ExtractionRequest,
    ) -> Result<ExtractedMedia, ResolveError> {
        self.as_ref().extract(content_id, request).await
    }
}

//! Transcription adapter for OpenAI-compatible Whisper APIs.
//!
//! Takes encoded audio bytes, validates them locally (non-empty, within the
//! service's payload limit) and submits a multipart upload. Any failure
//! aborts the pipeline run; nothing is retried.

use serde::Deserialize;
use thiserror::Error;

/// Maximum payload accepted by the OpenAI transcription endpoint (25 MB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Default transcription model.
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Default HTTP timeout for the transcription request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI transcription endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Failure modes of one transcription attempt.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Recording is empty; nothing to transcribe")]
    EmptyAudio,

    #[error(
        "Encoded audio is {size} bytes, over the {limit} byte API limit. \
         Record a shorter note or switch to mp3 upload format."
    )]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Transcription API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse transcription response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// One audio payload ready for upload.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub language: Option<String>,
}

impl TranscriptionRequest {
    /// Local checks that must pass before any network call is made.
    pub fn validate(&self) -> Result<(), TranscribeError> {
        if self.audio.is_empty() {
            return Err(TranscribeError::EmptyAudio);
        }
        if self.audio.len() > MAX_UPLOAD_BYTES {
            return Err(TranscribeError::PayloadTooLarge {
                size: self.audio.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}

/// Response structure for OpenAI-compatible APIs.
#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for one OpenAI-compatible transcription endpoint.
pub struct Transcriber {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Transcriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, TranscribeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Upload the audio and return the transcript text.
    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, TranscribeError> {
        request.validate()?;

        crate::verbose!(
            "Uploading {:.1} KB ({}) to {}",
            request.audio.len() as f64 / 1024.0,
            request.mime_type,
            self.api_url
        );

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(request.audio)
                    .file_name(request.file_name)
                    .mime_str(&request.mime_type)?,
            );

        if let Some(lang) = request.language {
            form = form.text("language", lang);
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscribeError::Api { status, message });
        }

        let body = response.text().await?;
        let parsed: TranscriptionResponse = serde_json::from_str(&body)?;
        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_audio(audio: Vec<u8>) -> TranscriptionRequest {
        TranscriptionRequest {
            audio,
            file_name: "voice_note.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
            language: None,
        }
    }

    #[test]
    fn empty_audio_is_rejected_locally() {
        let err = request_with_audio(Vec::new()).validate().unwrap_err();
        assert!(matches!(err, TranscribeError::EmptyAudio));
    }

    #[test]
    fn oversized_audio_is_rejected_before_any_network_call() {
        let err = request_with_audio(vec![0u8; MAX_UPLOAD_BYTES + 1])
            .validate()
            .unwrap_err();
        match err {
            TranscribeError::PayloadTooLarge { size, limit } => {
                assert_eq!(size, MAX_UPLOAD_BYTES + 1);
                assert_eq!(limit, MAX_UPLOAD_BYTES);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn payload_at_the_limit_passes_validation() {
        assert!(request_with_audio(vec![0u8; MAX_UPLOAD_BYTES]).validate().is_ok());
    }

    #[tokio::test]
    async fn uploads_audio_and_returns_the_transcript() {
        let (url, handle) =
            crate::testutil::spawn_one_shot_server(200, r#"{"text": "hello world"}"#);
        let transcriber = Transcriber::new("sk-test", "whisper-1")
            .unwrap()
            .with_api_url(url);

        let mut request = request_with_audio(vec![1, 2, 3]);
        request.language = Some("es".to_string());
        let transcript = transcriber.transcribe(request).await.unwrap();
        assert_eq!(transcript, "hello world");

        let sent = String::from_utf8_lossy(&handle.join().unwrap()).into_owned();
        assert!(sent.contains("Bearer sk-test"));
        assert!(sent.contains("whisper-1"));
        assert!(sent.contains("voice_note.mp3"));
        assert!(sent.contains("audio/mpeg"));
    }

    #[tokio::test]
    async fn non_success_status_becomes_an_api_error() {
        let (url, _handle) =
            crate::testutil::spawn_one_shot_server(429, r#"{"error": "rate limited"}"#);
        let transcriber = Transcriber::new("sk-test", "whisper-1")
            .unwrap()
            .with_api_url(url);

        let err = transcriber
            .transcribe(request_with_audio(vec![1, 2, 3]))
            .await
            .unwrap_err();
        match err {
            TranscribeError::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parses_transcript_from_response_body() {
        let body = r#"{"text": "hello world"}"#;
        let parsed: TranscriptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "hello world");
    }

    #[test]
    fn rejects_malformed_response_body() {
        let result: Result<TranscriptionResponse, _> = serde_json::from_str(r#"{"detail": "no"}"#);
        assert!(result.is_err());
    }
}

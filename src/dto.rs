use serde::{Deserialize, Serialize};

use crate::provider::TranscriptionResult;

/// The uniform body returned for every request, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success {
        success: bool,
        transcript: String,
        confidence: f64,
        duration: f64,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl ResponseEnvelope {
    pub fn success(result: TranscriptionResult) -> Self {
        Self::Success {
            success: true,
            transcript: result.transcript,
            confidence: result.confidence,
            duration: result.duration,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let envelope = ResponseEnvelope::success(TranscriptionResult {
            transcript: "hello".to_string(),
            confidence: 0.5,
            duration: 1.25,
        });
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            serde_json::json!({
                "success": true,
                "transcript": "hello",
                "confidence": 0.5,
                "duration": 1.25
            })
        );
    }

    #[test]
    fn failure_shape_decodes_back() {
        let body = serde_json::json!({ "success": false, "error": "no audio file received" });
        let envelope: ResponseEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope, ResponseEnvelope::failure("no audio file received"));
    }
}

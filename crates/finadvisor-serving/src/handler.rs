//! Request parsing and response shaping.
//!
//! The inbound body is a JSON object with an optional `income` field. The
//! outbound body is either a [`TrainResponse`] or an [`ErrorPayload`], both
//! serialized with camelCase keys.

use crate::error::{ServingError, ServingResult};
use finadvisor_training::{Prediction, SamplePrediction, TrainingRun};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Message returned on success.
pub const SUCCESS_MESSAGE: &str = "Model trained successfully";

/// A parsed training request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainRequest {
    /// Income to predict for, if the client supplied one.
    pub income: Option<f64>,
}

impl TrainRequest {
    /// Parses a raw request body.
    ///
    /// An empty body is treated like `{}`.
    pub fn from_body(body: &str) -> ServingResult<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ServingError::invalid_request(format!("Malformed JSON body: {}", e)))?;
        Self::from_json(&value)
    }

    /// Extracts the request from a parsed JSON body.
    ///
    /// Absent, `null` and empty-string incomes mean "no custom prediction".
    /// Numbers and numeric strings are accepted. Anything else is rejected.
    pub fn from_json(body: &Value) -> ServingResult<Self> {
        let income = match body {
            Value::Null => None,
            Value::Object(map) => match map.get("income") {
                None => None,
                Some(value) => parse_income(value)?,
            },
            _ => {
                return Err(ServingError::invalid_request(
                    "Request body must be a JSON object",
                ))
            }
        };
        Ok(Self { income })
    }
}

fn parse_income(value: &Value) -> ServingResult<Option<f64>> {
    let income = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match income {
        Some(income) if income.is_finite() => Ok(Some(income)),
        _ => Err(ServingError::invalid_request(format!(
            "income must be a finite number, got {}",
            value
        ))),
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    /// Human-readable status.
    pub message: String,
    /// Loss of the last training epoch.
    pub final_loss: f64,
    /// Prediction at the probe income.
    pub sample_prediction: SamplePrediction,
    /// Prediction at the requested income, or `null`.
    pub custom_prediction: Option<Prediction>,
}

impl TrainResponse {
    /// Assembles the response for a completed run.
    pub fn new(run: &TrainingRun, custom_prediction: Option<Prediction>) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            final_loss: run.final_loss,
            sample_prediction: run.sample,
            custom_prediction,
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Short error label.
    pub error: String,
    /// The underlying failure message.
    pub message: String,
}

impl From<&ServingError> for ErrorPayload {
    fn from(err: &ServingError) -> Self {
        Self {
            error: err.label().to_string(),
            message: err.to_string(),
        }
    }
}

/// Status of a handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// 200
    Ok,
    /// 400
    BadRequest,
    /// 500
    InternalServerError,
}

impl ResponseStatus {
    /// HTTP status code.
    pub fn code(&self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::BadRequest => 400,
            ResponseStatus::InternalServerError => 500,
        }
    }

    /// Whether the status is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Ok)
    }
}

/// Status plus JSON body, ready to hand to any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    /// Response status.
    pub status: ResponseStatus,
    /// Response body.
    pub body: Value,
}

impl TrainingOutcome {
    /// A 200 outcome carrying `response`.
    pub fn success(response: &TrainResponse) -> Self {
        Self::serialized(response)
    }

    /// A 200 outcome with `value` as the body, or a 500 if it cannot be
    /// serialized. Non-finite floats serialize as null rather than failing.
    fn serialized<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self {
                status: ResponseStatus::Ok,
                body,
            },
            Err(e) => Self::failure(&ServingError::internal(format!(
                "failed to serialize response: {}",
                e
            ))),
        }
    }

    /// A 400 or 500 outcome carrying an [`ErrorPayload`].
    pub fn failure(err: &ServingError) -> Self {
        let status = if err.is_client_error() {
            ResponseStatus::BadRequest
        } else {
            ResponseStatus::InternalServerError
        };
        let payload = ErrorPayload::from(err);
        Self {
            status,
            body: json!({ "error": payload.error, "message": payload.message }),
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parses the body as a success response.
    pub fn response(&self) -> Option<TrainResponse> {
        if !self.is_success() {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Parses the body as a failure payload.
    pub fn error(&self) -> Option<ErrorPayload> {
        if self.is_success() {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_income() {
        let req = TrainRequest::from_json(&json!({"income": 5000})).unwrap();
        assert_eq!(req.income, Some(5000.0));

        let req = TrainRequest::from_json(&json!({"income": 2500.5})).unwrap();
        assert_eq!(req.income, Some(2500.5));

        let req = TrainRequest::from_json(&json!({"income": 0})).unwrap();
        assert_eq!(req.income, Some(0.0));
    }

    #[test]
    fn test_parse_numeric_string_income() {
        let req = TrainRequest::from_json(&json!({"income": " 4200 "})).unwrap();
        assert_eq!(req.income, Some(4200.0));
    }

    #[test]
    fn test_parse_absent_income() {
        for body in [json!({}), json!({"income": null}), json!({"income": ""}), Value::Null] {
            assert_eq!(TrainRequest::from_json(&body).unwrap().income, None);
        }
        assert_eq!(TrainRequest::from_body("").unwrap().income, None);
        assert_eq!(TrainRequest::from_body("  ").unwrap().income, None);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for body in [
            json!({"income": "not-a-number"}),
            json!({"income": "NaN"}),
            json!({"income": "inf"}),
            json!({"income": true}),
            json!({"income": [5000]}),
            json!([1, 2]),
        ] {
            let err = TrainRequest::from_json(&body).unwrap_err();
            assert!(err.is_client_error(), "{} should be rejected", body);
        }
        assert!(TrainRequest::from_body("{income:").unwrap_err().is_client_error());
    }

    #[test]
    fn test_failure_outcomes() {
        let outcome = TrainingOutcome::failure(&ServingError::invalid_request("bad income"));
        assert_eq!(outcome.status.code(), 400);
        let payload = outcome.error().unwrap();
        assert_eq!(payload.error, "Invalid request");
        assert_eq!(payload.message, "bad income");
        assert!(outcome.response().is_none());

        let outcome = TrainingOutcome::failure(&ServingError::internal("boom"));
        assert_eq!(outcome.status, ResponseStatus::InternalServerError);
        assert_eq!(outcome.body["message"], "Internal error: boom");
    }

    #[test]
    fn test_success_outcome_shape() {
        let response = TrainResponse {
            message: SUCCESS_MESSAGE.to_string(),
            final_loss: 12.5,
            sample_prediction: SamplePrediction {
                income: 6000.0,
                prediction: [600.0, 900.0, 750.0],
            },
            custom_prediction: None,
        };
        let outcome = TrainingOutcome::success(&response);
        assert_eq!(outcome.status.code(), 200);
        assert_eq!(outcome.body["message"], "Model trained successfully");
        assert_eq!(outcome.body["finalLoss"], 12.5);
        assert_eq!(outcome.body["samplePrediction"]["income"], 6000.0);
        assert!(outcome.body["customPrediction"].is_null());
        assert!(outcome.body.as_object().unwrap().contains_key("customPrediction"));
        assert_eq!(outcome.response().unwrap(), response);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn test_serialization_failure_is_internal_error() {
        let outcome = TrainingOutcome::serialized(&Unserializable);
        assert_eq!(outcome.status.code(), 500);
        let payload = outcome.error().unwrap();
        assert_eq!(payload.error, "Internal server error");
        assert_eq!(
            payload.message,
            "Internal error: failed to serialize response: refused"
        );
    }
}

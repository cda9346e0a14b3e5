use finadvisor_layers::Tensor;
use finadvisor_serving::{AdvisorService, ResponseStatus, ServingConfig};
use finadvisor_training::{Dataset, DatasetProvider, TestSet, TrainingResult, TrainingSet};
use serde_json::json;
use std::sync::Arc;

struct MalformedTargets;

impl DatasetProvider for MalformedTargets {
    fn load(&self) -> TrainingResult<Dataset> {
        Ok(Dataset {
            training: TrainingSet::from_tensors(Tensor::zeros(&[14, 1]), Tensor::zeros(&[14, 2])),
            test: TestSet::new(vec![1000.0, 2250.0]),
        })
    }
}

fn service() -> AdvisorService {
    AdvisorService::new(ServingConfig::builder().epochs(50).build()).unwrap()
}

#[tokio::test]
async fn sample_prediction_uses_probe_income() {
    let outcome = service().handle(&json!({})).await;

    assert_eq!(outcome.status, ResponseStatus::Ok);
    let response = outcome.response().unwrap();
    assert_eq!(response.message, "Model trained successfully");
    assert_eq!(response.sample_prediction.income, 6000.0);
    assert_eq!(response.sample_prediction.prediction.len(), 3);
    assert!(response.final_loss.is_finite());
}

#[tokio::test]
async fn custom_income_is_predicted() {
    let outcome = service().handle(&json!({ "income": 5000 })).await;

    assert!(outcome.is_success());
    let custom = outcome.response().unwrap().custom_prediction.unwrap();
    assert_eq!(custom.income, 5000.0);
    assert!(custom.is_finite());
    assert_eq!(outcome.body["customPrediction"]["income"], 5000.0);
}

#[tokio::test]
async fn missing_income_gives_null_custom_prediction() {
    let service = service();
    for body in [json!({}), json!({ "income": null }), json!({ "income": "" })] {
        let outcome = service.handle(&body).await;
        assert!(outcome.is_success());
        assert!(outcome.body["customPrediction"].is_null());
        assert!(outcome.response().unwrap().custom_prediction.is_none());
    }
}

#[tokio::test]
async fn non_numeric_income_is_rejected_without_training() {
    let service = service();
    let outcome = service.handle(&json!({ "income": "not-a-number" })).await;

    assert_eq!(outcome.status.code(), 400);
    let payload = outcome.error().unwrap();
    assert_eq!(payload.error, "Invalid request");
    assert!(payload.message.contains("not-a-number"));
    assert_eq!(service.stats().trainings_completed, 0);
}

#[tokio::test]
async fn raw_body_round_trip() {
    let service = service();

    let outcome = service.handle_body(r#"{"income": "7500"}"#).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.body["customPrediction"]["income"], 7500.0);

    let outcome = service.handle_body("{not json").await;
    assert_eq!(outcome.status, ResponseStatus::BadRequest);
}

#[tokio::test]
async fn malformed_training_shapes_return_server_error() {
    let service = AdvisorService::with_provider(
        ServingConfig::builder().epochs(10).build(),
        Arc::new(MalformedTargets),
    )
    .unwrap();

    let outcome = service.handle(&json!({ "income": 5000 })).await;

    assert_eq!(outcome.status.code(), 500);
    let payload = outcome.error().unwrap();
    assert_eq!(payload.error, "Error during training");
    assert_eq!(
        payload.message,
        "Shape mismatch: expected [14, 3], got [14, 2]"
    );

    let stats = service.stats();
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.trainings_completed, 0);
}

#[tokio::test]
async fn retrain_per_request_is_reproducible() {
    let service = service();
    let a = service.handle(&json!({ "income": 5000 })).await.response().unwrap();
    let b = service.handle(&json!({ "income": 5000 })).await.response().unwrap();

    assert!((a.final_loss - b.final_loss).abs() <= 1e-6 * a.final_loss.abs().max(1.0));
    assert_eq!(a.sample_prediction, b.sample_prediction);
    assert_eq!(service.stats().trainings_completed, 2);
}

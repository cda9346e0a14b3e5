use finadvisor_serving::{AdvisorService, ModelPolicy, ServingConfig};
use finadvisor_training::{
    Dataset, DatasetProvider, SyntheticDataset, TrainingError, TrainingResult,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts loads and fails the first `failures` of them.
struct CountingProvider {
    loads: AtomicUsize,
    failures: usize,
}

impl CountingProvider {
    fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            loads: AtomicUsize::new(0),
            failures,
        })
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DatasetProvider for CountingProvider {
    fn load(&self) -> TrainingResult<Dataset> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(TrainingError::EmptyDataset);
        }
        SyntheticDataset.load()
    }
}

fn config(policy: ModelPolicy) -> ServingConfig {
    ServingConfig::builder()
        .model_policy(policy)
        .epochs(20)
        .build()
}

#[tokio::test]
async fn train_once_coalesces_concurrent_first_requests() {
    let provider = CountingProvider::new(0);
    let service = AdvisorService::with_provider(config(ModelPolicy::TrainOnce), provider.clone())
        .unwrap();

    let body = json!({ "income": 4000 });
    let (a, b, c) = tokio::join!(
        service.handle(&body),
        service.handle(&body),
        service.handle(&body)
    );

    assert!(a.is_success() && b.is_success() && c.is_success());
    assert_eq!(provider.loads(), 1);
    assert_eq!(a.body, b.body);
    assert_eq!(b.body, c.body);
    assert_eq!(service.stats().trainings_completed, 1);
}

#[tokio::test]
async fn train_once_does_not_cache_failures() {
    let provider = CountingProvider::new(1);
    let service = AdvisorService::with_provider(config(ModelPolicy::TrainOnce), provider.clone())
        .unwrap();

    let first = service.handle(&json!({})).await;
    assert_eq!(first.status.code(), 500);
    assert_eq!(first.body["message"], "Training set is empty");

    let second = service.handle(&json!({})).await;
    assert!(second.is_success());
    let third = service.handle(&json!({})).await;
    assert!(third.is_success());

    assert_eq!(provider.loads(), 2);
}

#[tokio::test]
async fn retrain_per_request_trains_every_time() {
    let provider = CountingProvider::new(0);
    let service =
        AdvisorService::with_provider(config(ModelPolicy::RetrainPerRequest), provider.clone())
            .unwrap();

    for _ in 0..3 {
        assert!(service.handle(&json!({})).await.is_success());
    }
    assert_eq!(provider.loads(), 3);
}

#[tokio::test]
async fn admission_limit_of_one_still_serves_all() {
    let service = AdvisorService::new(
        ServingConfig::builder()
            .max_concurrent_trainings(1)
            .epochs(10)
            .build(),
    )
    .unwrap();

    let low = json!({ "income": 1000 });
    let high = json!({ "income": 2000 });
    let (a, b) = tokio::join!(service.handle(&low), service.handle(&high));
    assert!(a.is_success());
    assert!(b.is_success());
    assert_eq!(service.stats().successful_requests, 2);
}

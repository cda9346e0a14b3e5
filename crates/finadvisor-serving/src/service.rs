//! The advisor service: one request in, one training outcome out.
//!
//! Training is CPU-bound and runs on tokio's blocking pool. A semaphore bounds
//! how many runs execute at once. Under [`ModelPolicy::TrainOnce`] the first
//! successful run is cached; concurrent first requests queue on the same lock
//! and reuse that run instead of starting their own.

use crate::config::{ModelPolicy, ServingConfig};
use crate::error::{ServingError, ServingResult};
use crate::handler::{TrainRequest, TrainResponse, TrainingOutcome};
use finadvisor_training::{
    DatasetProvider, Prediction, SyntheticDataset, TrainingPipeline, TrainingRun,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, error, info, warn};

/// Request counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total number of requests received
    pub total_requests: u64,

    /// Requests answered with a success response
    pub successful_requests: u64,

    /// Requests rejected as invalid
    pub rejected_requests: u64,

    /// Requests that failed during training or prediction
    pub failed_requests: u64,

    /// Training runs that completed successfully
    pub trainings_completed: u64,

    /// Cumulative training time in milliseconds
    pub total_training_ms: u64,
}

/// Trains the advisor model on demand and answers requests.
pub struct AdvisorService {
    config: ServingConfig,
    pipeline: TrainingPipeline,
    provider: Arc<dyn DatasetProvider>,
    admission: Arc<Semaphore>,
    cached: Mutex<Option<Arc<TrainingRun>>>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl AdvisorService {
    /// Creates a service over the synthetic dataset.
    pub fn new(config: ServingConfig) -> ServingResult<Self> {
        Self::with_provider(config, Arc::new(SyntheticDataset))
    }

    /// Creates a service over an explicit dataset provider.
    pub fn with_provider(
        config: ServingConfig,
        provider: Arc<dyn DatasetProvider>,
    ) -> ServingResult<Self> {
        config.validate()?;
        info!(
            policy = ?config.model_policy,
            max_concurrent_trainings = config.max_concurrent_trainings,
            epochs = config.trainer.epochs,
            provider = provider.name(),
            "Advisor service configured"
        );
        Ok(Self {
            pipeline: TrainingPipeline::new(config.model.clone(), config.trainer.clone()),
            admission: Arc::new(Semaphore::new(config.max_concurrent_trainings)),
            cached: Mutex::new(None),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
            provider,
            config,
        })
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServingConfig {
        &self.config
    }

    /// Snapshot of the request counters.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Handles a raw request body. Never fails: every error becomes a 400 or
    /// 500 outcome.
    pub async fn handle_body(&self, body: &str) -> TrainingOutcome {
        match TrainRequest::from_body(body) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => self.reject(&e),
        }
    }

    /// Handles a parsed JSON body.
    pub async fn handle(&self, body: &Value) -> TrainingOutcome {
        match TrainRequest::from_json(body) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => self.reject(&e),
        }
    }

    /// Handles an already validated request.
    pub async fn handle_request(&self, request: TrainRequest) -> TrainingOutcome {
        self.stats.write().total_requests += 1;
        info!(income = ?request.income, "Received form data");

        match self.train(request.income).await {
            Ok(response) => {
                self.stats.write().successful_requests += 1;
                if let Some(custom) = &response.custom_prediction {
                    info!(
                        income = custom.income,
                        savings = custom.savings,
                        retirement = custom.retirement,
                        investments = custom.investments,
                        "Custom prediction"
                    );
                }
                TrainingOutcome::success(&response)
            }
            Err(e) => {
                self.stats.write().failed_requests += 1;
                error!(error = %e, "Error during training");
                TrainingOutcome::failure(&e)
            }
        }
    }

    /// Obtains a trained model and predicts `income` if given.
    pub async fn train(&self, income: Option<f64>) -> ServingResult<TrainResponse> {
        let run = self.obtain_run().await?;
        let custom = income.map(|i| run.predict_one(i)).transpose()?;
        Ok(TrainResponse::new(&run, custom))
    }

    /// Predicts a batch of incomes with a trained model, in input order.
    pub async fn predict(&self, incomes: &[f64]) -> ServingResult<Vec<Prediction>> {
        let run = self.obtain_run().await?;
        Ok(run.predict(incomes)?)
    }

    /// Drops the cached model, if any.
    pub async fn invalidate(&self) {
        if self.cached.lock().await.take().is_some() {
            info!("Cached model dropped");
        }
    }

    fn reject(&self, err: &ServingError) -> TrainingOutcome {
        {
            let mut stats = self.stats.write();
            stats.total_requests += 1;
            stats.rejected_requests += 1;
        }
        warn!(error = %err, "Rejected request");
        TrainingOutcome::failure(err)
    }

    async fn obtain_run(&self) -> ServingResult<Arc<TrainingRun>> {
        match self.config.model_policy {
            ModelPolicy::RetrainPerRequest => self.train_fresh().await,
            ModelPolicy::TrainOnce => {
                let mut cached = self.cached.lock().await;
                if let Some(run) = cached.as_ref() {
                    debug!("Reusing cached model");
                    return Ok(run.clone());
                }
                let run = self.train_fresh().await?;
                *cached = Some(run.clone());
                Ok(run)
            }
        }
    }

    async fn train_fresh(&self) -> ServingResult<Arc<TrainingRun>> {
        let _permit = self
            .admission
            .acquire()
            .await
            .map_err(|e| ServingError::internal(e.to_string()))?;

        let pipeline = self.pipeline.clone();
        let provider = self.provider.clone();
        let start = Instant::now();
        let run = tokio::task::spawn_blocking(move || pipeline.run(&*provider))
            .await
            .map_err(|e| ServingError::internal(format!("Training task failed: {}", e)))??;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        {
            let mut stats = self.stats.write();
            stats.trainings_completed += 1;
            stats.total_training_ms += elapsed_ms;
        }
        debug!(elapsed_ms, final_loss = run.final_loss, "Training run complete");
        Ok(Arc::new(run))
    }
}

impl std::fmt::Debug for AdvisorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorService")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .field("stats", &self.stats())
            .finish()
    }
}

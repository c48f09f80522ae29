//! Application state management

use pii_core::config::{AppConfig, ModelConfig};
use pii_core::{PiiDetector, Result};
use pii_extractor::{NameModel, PiiAnalyzer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Completed analyses
    pub analysis_count: AtomicU64,
    /// Findings returned across all analyses
    pub findings_count: AtomicU64,
    /// PII detector (set by `initialize_analyzer`, cleared by `shutdown`)
    detector: RwLock<Option<Arc<dyn PiiDetector>>>,
}

impl AppState {
    /// Create new application state with config
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            analysis_count: AtomicU64::new(0),
            findings_count: AtomicU64::new(0),
            detector: RwLock::new(None),
        }
    }

    /// Create state with an already built detector
    pub fn with_detector(config: AppConfig, detector: Arc<dyn PiiDetector>) -> Self {
        let state = Self::new(config);
        Self {
            detector: RwLock::new(Some(detector)),
            ..state
        }
    }

    /// Train the name model once and install the analyzer
    pub async fn initialize_analyzer(&self) -> Result<()> {
        let model = build_name_model(&self.config.model)?;
        let analyzer = PiiAnalyzer::new(model).with_model_config(&self.config.model);

        self.set_detector(Arc::new(analyzer)).await;
        tracing::info!("PII analyzer initialized");
        Ok(())
    }

    pub async fn set_detector(&self, detector: Arc<dyn PiiDetector>) {
        *self.detector.write().await = Some(detector);
    }

    /// Get the detector if initialized
    pub async fn get_detector(&self) -> Option<Arc<dyn PiiDetector>> {
        self.detector.read().await.clone()
    }

    /// Check if service is ready
    pub async fn is_ready(&self) -> bool {
        self.detector.read().await.is_some()
    }

    /// Release the detector; later requests report it as not initialized
    pub async fn shutdown(&self) {
        self.detector.write().await.take();
        tracing::info!("PII analyzer released");
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Record one completed analysis
    pub fn record_analysis(&self, findings: usize) {
        self.analysis_count.fetch_add(1, Ordering::SeqCst);
        self.findings_count
            .fetch_add(findings as u64, Ordering::SeqCst);
    }

    pub fn get_analysis_count(&self) -> u64 {
        self.analysis_count.load(Ordering::SeqCst)
    }

    pub fn get_findings_count(&self) -> u64 {
        self.findings_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Train from the names corpus and persist the artifact.
///
/// Falls back to a saved artifact when the corpus cannot be read.
pub fn build_name_model(config: &ModelConfig) -> Result<NameModel> {
    match NameModel::from_corpus_file(&config.names_path) {
        Ok(model) => {
            if let Err(e) = model.save(&config.artifact_path) {
                tracing::warn!(error = %e, "Could not persist name model artifact");
            }
            Ok(model)
        }
        Err(err) if config.artifact_path.exists() => {
            tracing::warn!(
                error = %err,
                artifact = %config.artifact_path.display(),
                "Names corpus unavailable, loading saved model artifact"
            );
            NameModel::load(&config.artifact_path)
        }
        Err(err) => Err(err),
    }
}

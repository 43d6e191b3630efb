//! Debounced preview rendering.
//!
//! Submissions overwrite a single pending slot. A background task waits
//! for a quiet period with no newer submission, then runs the pipeline on
//! the latest request. Each submission carries a generation number and a
//! finished frame only replaces the current one if it is newer, so a slow
//! run that finishes after a faster later one is dropped.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::models::PreviewConfig;
use crate::services::{Pipeline, ProcessRequest};

/// A committed preview
#[derive(Debug)]
pub struct PreviewFrame {
    pub generation: u64,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub completed_at: DateTime<Utc>,
}

/// A run that failed. The previous frame stays current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFailure {
    pub generation: u64,
    pub message: String,
}

#[derive(Clone)]
struct Pending {
    generation: u64,
    source: Arc<Vec<u8>>,
    request: ProcessRequest,
}

#[derive(Default)]
struct Shared {
    frame: RwLock<Option<Arc<PreviewFrame>>>,
    last_error: RwLock<Option<PreviewFailure>>,
    /// Generation of the latest submission
    submitted: AtomicU64,
    runs: AtomicU64,
}

impl Shared {
    /// Swap in `frame` unless an equal or newer generation is committed.
    /// A successful commit clears any older failure.
    async fn commit(&self, frame: PreviewFrame) -> bool {
        let generation = frame.generation;
        {
            let mut slot = self.frame.write().await;
            if let Some(current) = slot.as_ref() {
                if current.generation >= generation {
                    tracing::warn!(
                        stale = generation,
                        current = current.generation,
                        "Dropping stale preview"
                    );
                    return false;
                }
            }
            *slot = Some(Arc::new(frame));
        }

        let mut last_error = self.last_error.write().await;
        if last_error.as_ref().is_some_and(|e| e.generation < generation) {
            *last_error = None;
        }
        true
    }

    /// Record a failed run unless a newer request has been submitted since.
    async fn fail(&self, failure: PreviewFailure) -> bool {
        let latest = self.submitted.load(Ordering::SeqCst);
        if failure.generation < latest {
            tracing::debug!(
                generation = failure.generation,
                latest,
                "Ignoring failure of superseded preview"
            );
            return false;
        }
        tracing::warn!(generation = failure.generation, error = %failure.message, "Preview run failed");
        *self.last_error.write().await = Some(failure);
        true
    }
}

pub struct PreviewScheduler {
    pending: watch::Sender<Option<Pending>>,
    finished: watch::Sender<u64>,
    shared: Arc<Shared>,
}

impl PreviewScheduler {
    /// Create the scheduler and spawn its debounce task on the current
    /// runtime. The task ends when the scheduler is dropped.
    pub fn new(pipeline: Arc<Pipeline>, config: &PreviewConfig) -> Self {
        let (pending, rx) = watch::channel(None);
        let (finished, _) = watch::channel(0);
        let shared = Arc::new(Shared::default());
        let debounce = Duration::from_millis(config.debounce_ms);

        tokio::spawn(debounce_loop(
            rx,
            debounce,
            pipeline,
            shared.clone(),
            finished.clone(),
        ));

        Self {
            pending,
            finished,
            shared,
        }
    }

    /// Queue a render, replacing any request still waiting out the quiet
    /// period. Returns the generation assigned to it.
    ///
    /// The generation is taken while the pending slot is locked, so the
    /// slot always holds the highest generation handed out.
    pub fn submit(&self, source: Vec<u8>, request: ProcessRequest) -> u64 {
        let source = Arc::new(source);
        let mut generation = 0;
        self.pending.send_modify(|slot| {
            generation = self.shared.submitted.fetch_add(1, Ordering::SeqCst) + 1;
            *slot = Some(Pending {
                generation,
                source,
                request,
            });
        });
        tracing::debug!(generation, tool = %request.tool, "Preview submitted");
        generation
    }

    /// Latest committed frame
    pub async fn current(&self) -> Option<Arc<PreviewFrame>> {
        self.shared.frame.read().await.clone()
    }

    pub async fn last_error(&self) -> Option<PreviewFailure> {
        self.shared.last_error.read().await.clone()
    }

    /// Number of pipeline runs started so far
    pub fn runs(&self) -> u64 {
        self.shared.runs.load(Ordering::SeqCst)
    }

    /// Receiver of the generation of each finished run, committed or not
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.finished.subscribe()
    }
}

async fn debounce_loop(
    mut rx: watch::Receiver<Option<Pending>>,
    debounce: Duration,
    pipeline: Arc<Pipeline>,
    shared: Arc<Shared>,
    finished: watch::Sender<u64>,
) {
    while rx.changed().await.is_ok() {
        // Restart the quiet period on every newer submission
        loop {
            match tokio::time::timeout(debounce, rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        let Some(pending) = rx.borrow_and_update().clone() else {
            continue;
        };

        shared.runs.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(render(
            pending,
            pipeline.clone(),
            shared.clone(),
            finished.clone(),
        ));
    }
    tracing::debug!("Preview scheduler stopped");
}

async fn render(
    pending: Pending,
    pipeline: Arc<Pipeline>,
    shared: Arc<Shared>,
    finished: watch::Sender<u64>,
) {
    let generation = pending.generation;

    match pipeline
        .process_blocking(pending.source, pending.request)
        .await
    {
        Ok(image) => {
            let frame = PreviewFrame {
                generation,
                png: image.png,
                width: image.width,
                height: image.height,
                completed_at: Utc::now(),
            };
            if shared.commit(frame).await {
                tracing::info!(generation, width = image.width, height = image.height, "Preview committed");
            }
        }
        Err(e) => {
            shared
                .fail(PreviewFailure {
                    generation,
                    message: e.to_string(),
                })
                .await;
        }
    }

    finished.send_modify(|latest| *latest = (*latest).max(generation));
}

use std::sync::Arc;

use defer_core::OperationError;
use defer_exec::{
    Document, HttpDocument, SimulatedDocument, SimulatedOutcome, load_chain, load_script,
    load_script_with,
    routines::{may_fail, parallel, parallel_all, sequential},
};
use defer_model::{LoadedResource, Locator, RoutineKind};
use defer_observe::watch;
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

use crate::config::DemoConfig;

/// Document the loading routines attach scripts to.
///
/// Offline, only the first configured script loads; every other one fails.
pub fn build_document(cfg: &DemoConfig) -> Arc<dyn Document> {
    if !cfg.offline {
        return Arc::new(HttpDocument::default());
    }

    let mut doc = SimulatedDocument::new();
    if let Some(first) = cfg.scripts.first() {
        doc = doc.route(first.clone(), SimulatedOutcome::Load { size: 50_000 });
    }
    Arc::new(doc)
}

/// Outcome of one routine, as far as the walkthrough cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Completed,
    /// The routine's operation was rejected and the rejection was reported.
    Rejected(String),
}

pub struct Walkthrough {
    cfg: DemoConfig,
    document: Arc<dyn Document>,
}

impl Walkthrough {
    pub fn new(cfg: DemoConfig, document: Arc<dyn Document>) -> Self {
        Self { cfg, document }
    }

    /// Run every configured routine in order; rejections don't stop the run.
    pub async fn run(&self) -> Vec<(RoutineKind, Verdict)> {
        let mut verdicts = Vec::with_capacity(self.cfg.routines.len());
        for &kind in &self.cfg.routines {
            let verdict = self.run_one(kind).await;
            if let Verdict::Rejected(reason) = &verdict {
                warn!(routine = kind.kind(), %reason, "routine ended with a rejection");
            }
            verdicts.push((kind, verdict));
        }
        verdicts
    }

    #[instrument(level = "info", skip(self), fields(routine = kind.kind()))]
    pub async fn run_one(&self, kind: RoutineKind) -> Verdict {
        let outcome = match kind {
            RoutineKind::LoadCallback => self.load_callback().await.map(|_| ()),
            RoutineKind::LoadScript => self.load_script().await.map(|_| ()),
            RoutineKind::LoadChain => self.load_chain().await.map(|_| ()),
            RoutineKind::Sequential => sequential(&self.cfg.pair).await.map(|_| ()),
            RoutineKind::Parallel => parallel(&self.cfg.pair).await.map(|_| ()),
            RoutineKind::ParallelAll => parallel_all(&self.cfg.all).await.map(|_| ()),
            RoutineKind::MayFail => {
                may_fail(&self.cfg.failure).await;
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Verdict::Completed,
            Err(e) => Verdict::Rejected(e.message().to_string()),
        }
    }

    fn first_script(&self) -> Result<Locator, OperationError> {
        self.cfg
            .scripts
            .first()
            .cloned()
            .ok_or_else(|| OperationError::new("no script configured"))
    }

    async fn load_callback(&self) -> Result<LoadedResource, OperationError> {
        let src = self.first_script()?;
        let (tx, rx) = oneshot::channel();

        load_script_with(&*self.document, src, move |outcome| {
            match &outcome {
                Ok(resource) => info!(src = %resource.src, "callback: script loaded"),
                Err(e) => warn!(reason = e.message(), "callback: load failed"),
            }
            let _ = tx.send(outcome);
        });

        rx.await
            .map_err(|_| OperationError::new("load callback dropped without firing"))?
    }

    async fn load_script(&self) -> Result<LoadedResource, OperationError> {
        let src = self.first_script()?;
        let loading = load_script(&*self.document, src.clone());
        watch(src.to_string(), &loading);

        let resource = loading.await?;
        info!(src = %resource.src, size = ?resource.size, "script loaded");
        Ok(resource)
    }

    async fn load_chain(&self) -> Result<Vec<LoadedResource>, OperationError> {
        let loaded = load_chain(Arc::clone(&self.document), self.cfg.scripts.clone()).await?;
        info!(count = loaded.len(), "every script in the chain loaded");
        Ok(loaded)
    }
}

// Executes state machine effects and feeds their results back in
use super::state::{Effect, Event, Navigator};
use crate::api::Gateway;
use crate::config::ConfigStore;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct Runtime {
    navigator: Navigator,
    store: ConfigStore,
    gateway: Arc<dyn Gateway>,
    results_tx: UnboundedSender<Event>,
    results_rx: UnboundedReceiver<Event>,
}

impl Runtime {
    pub fn new(navigator: Navigator, store: ConfigStore, gateway: Arc<dyn Gateway>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            navigator,
            store,
            gateway,
            results_tx,
            results_rx,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Apply an event and everything it triggers synchronously.
    /// Network effects are spawned; their results arrive later via the channel.
    pub fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.navigator.handle(event) {
                if let Some(follow_up) = self.execute(effect) {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    /// Dispatch every background result that has already arrived.
    /// Returns how many were processed.
    pub fn drain_results(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.results_rx.try_recv() {
            self.dispatch(event);
            processed += 1;
        }
        processed
    }

    fn execute(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Persist => match self.store.save(self.navigator.document()) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!("Failed to persist platforms: {}", e);
                    Some(Event::StorageFailed(e.to_string()))
                }
            },
            Effect::AcquireToken { request, profile } => {
                let gateway = Arc::clone(&self.gateway);
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let result = gateway
                        .acquire_token(&profile)
                        .await
                        .map_err(|e| e.to_string());
                    if let Err(message) = &result {
                        tracing::warn!("Token request for '{}' failed: {}", profile.name, message);
                    }
                    let _ = tx.send(Event::TokenAcquired { request, result });
                });
                None
            }
            Effect::FetchClusters {
                request,
                base_url,
                token,
            } => {
                let gateway = Arc::clone(&self.gateway);
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let result = gateway
                        .list_clusters(&base_url, &token)
                        .await
                        .map_err(|e| e.to_string());
                    if let Err(message) = &result {
                        tracing::warn!("Cluster fetch from {} failed: {}", base_url, message);
                    }
                    let _ = tx.send(Event::ClustersFetched { request, result });
                });
                None
            }
        }
    }
}

//! Hands ISS notifications to the observers that act on them.

use std::sync::Arc;

use hw_04_state_validation::IssObserver;
use shared_types::IssNotification;
use tokio::sync::{mpsc, watch};
use tracing::info;

pub struct IssStage {
    receiver: mpsc::Receiver<IssNotification>,
    observers: Vec<Arc<dyn IssObserver>>,
}

impl IssStage {
    pub fn new(
        receiver: mpsc::Receiver<IssNotification>,
        observers: Vec<Arc<dyn IssObserver>>,
    ) -> Self {
        Self {
            receiver,
            observers,
        }
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(observers = self.observers.len(), "ISS stage started");
        loop {
            tokio::select! {
                notification = self.receiver.recv() => match notification {
                    Some(notification) => self.dispatch(notification),
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
        info!("ISS stage stopped");
    }

    fn dispatch(&self, notification: IssNotification) {
        for observer in &self.observers {
            observer.iss_observed(notification);
        }
    }
}

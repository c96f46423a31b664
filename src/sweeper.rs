use std::sync::Arc;

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    messages::{MessageStore, NewMessage},
    participants::{Directory, Participant},
};

/// Evicts participants whose last renewal is `threshold` or more in the past
/// and announces each departure with a "left" status message.
#[derive(Clone)]
pub struct Sweeper {
    directory: Arc<dyn Directory>,
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
    period: std::time::Duration,
    threshold: time::Duration,
}

impl Sweeper {
    pub fn new(
        directory: Arc<dyn Directory>,
        store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
        period: std::time::Duration,
        threshold: time::Duration,
    ) -> Sweeper {
        Sweeper { directory, store, clock, period, threshold }
    }

    /// One cycle. Returns who was evicted, whether or not their
    /// announcement made it into the store.
    pub async fn sweep(&self) -> Vec<Participant> {
        let evicted = match self.directory.evict_stale(self.threshold, self.clock.now()).await {
            Ok(evicted) => evicted,
            Err(err) => {
                warn!("sweep skipped: {err}");
                return Vec::new();
            }
        };

        for participant in &evicted {
            match self.store.append(NewMessage::status(&participant.name, "left")).await {
                Ok(_) => info!("{} left", participant.name),
                Err(err) => warn!("evicted {} but could not announce it: {err}", participant.name),
            }
        }

        evicted
    }

    /// Sweeps every `period` until the handle is aborted. Each cycle runs on
    /// its own task so a slow store never delays the next tick.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick fires immediately; nobody can be stale yet
            ticker.tick().await;

            loop {
                ticker.tick().await;
                debug!("sweeping");
                let sweeper = self.clone();
                tokio::spawn(async move {
                    sweeper.sweep().await;
                });
            }
        })
    }
}

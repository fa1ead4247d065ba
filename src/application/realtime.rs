// Wall-clock driver: runs one node per tokio task on a fixed interval
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domains::mobility::MobilityNode;

/// Handle used to stop every node spawned with its receiver.
pub struct ShutdownSignal {
    sender: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Stored even with no subscribers, so late receivers still see it.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `node` every time step on the tokio clock until shutdown, then hand
/// the node back. The task owns the node exclusively; the first tick fires
/// one time step after spawning.
pub fn spawn_realtime_node(mut node: MobilityNode, mut shutdown: watch::Receiver<bool>) -> JoinHandle<MobilityNode> {
    tokio::spawn(async move {
        let step = node.model().time_step();
        let start = Instant::now();
        let mut ticker = time::interval_at(start + step, step);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // A signal sent before subscribing is already marked seen.
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    node.tick(start.elapsed());
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Realtime driver for node {} stopped after {} ticks", node.id(), node.model().ticks());
        node
    })
}

//! Orchestrator: classify, dispatch, publish placeholders, then resolve
//! interactive displays in the background.
//!
//! Each processed input starts a new generation. The published list and the
//! generation counter live behind one lock, and every resolution checks its
//! generation under that lock before touching the list, so a result computed
//! for an older input is never published.
//!
//! Resolutions start after a fixed delay. A newer input aborts the delayed
//! starts that have not fired yet; lookups already running finish and are
//! discarded by the generation check.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use sniffer_types::{Display, DisplayData, DisplayUpdate, InteractiveDisplay, StaticDisplay};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::classifier::classify;
use crate::dispatch::{dispatch, sort_displays, DispatchContext};

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    input: String,
    displays: Vec<StaticDisplay>,
}

pub struct Orchestrator {
    context: Arc<DispatchContext>,
    state: Arc<Mutex<Published>>,
    updates: UnboundedSender<DisplayUpdate>,
    scheduled: Vec<JoinHandle<()>>,
    resolve_delay: Duration,
}

impl Orchestrator {
    /// Creates an orchestrator and the receiving end of its update channel.
    /// The resolve delay comes from the context's settings.
    pub fn new(context: DispatchContext) -> (Self, UnboundedReceiver<DisplayUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let resolve_delay = Duration::from_millis(context.settings.resolve_delay_ms);
        let orchestrator = Self {
            context: Arc::new(context),
            state: Arc::new(Mutex::new(Published::default())),
            updates,
            scheduled: Vec::new(),
            resolve_delay,
        };
        (orchestrator, receiver)
    }

    pub fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = delay;
        self
    }

    pub fn context(&self) -> &DispatchContext {
        &self.context
    }

    /// Latest published list.
    pub fn current(&self) -> Vec<StaticDisplay> {
        self.state.lock().displays.clone()
    }

    pub fn current_input(&self) -> String {
        self.state.lock().input.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Displays of the current generation still waiting for their lookup.
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .displays
            .iter()
            .filter(|d| d.data.is_pending())
            .count()
    }

    /// Interprets `raw` and publishes the sorted list, with placeholders for
    /// interactive displays. Resolved displays arrive later on the update
    /// channel, one per interactive display unless superseded.
    ///
    /// A dispatch error leaves the previously published list in place.
    pub async fn process_input(&mut self, raw: &str) -> Result<Vec<StaticDisplay>> {
        let input = raw.trim();
        let properties = classify(input);
        debug!(input = input, properties = %properties, "classified input");

        let mut displays = match dispatch(input, &properties, &self.context).await {
            Ok(displays) => displays,
            Err(e) => {
                error!(input = input, error = %format!("{:#}", e), "dispatch failed");
                return Err(e);
            }
        };
        sort_displays(&mut displays);

        let projection: Vec<StaticDisplay> = displays
            .iter()
            .map(|display| match display {
                Display::Static(d) => d.clone(),
                Display::Interactive(d) => d.placeholder(),
            })
            .collect();

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.input = input.to_string();
            state.displays = projection.clone();
            state.generation
        };

        let revoked = self.scheduled.len();
        for handle in self.scheduled.drain(..) {
            handle.abort();
        }

        for display in displays {
            if let Display::Interactive(interactive) = display {
                let handle = self.schedule(generation, interactive);
                self.scheduled.push(handle);
            }
        }

        info!(
            generation = generation,
            displays = projection.len(),
            interactive = self.scheduled.len(),
            revoked = revoked,
            "published"
        );
        Ok(projection)
    }

    fn schedule(&self, generation: u64, display: InteractiveDisplay) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let updates = self.updates.clone();
        let delay = self.resolve_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // detached: aborting the timer must not cancel a started lookup
            tokio::spawn(resolve(generation, display, state, updates));
        })
    }
}

async fn resolve(
    generation: u64,
    display: InteractiveDisplay,
    state: Arc<Mutex<Published>>,
    updates: UnboundedSender<DisplayUpdate>,
) {
    let resolved = display.resolve().await;
    if let DisplayData::Error(message) = &resolved.data {
        warn!(id = %resolved.id(), error = %message, "lookup failed");
    }

    let mut state = state.lock();
    if state.generation != generation {
        debug!(
            id = %resolved.id(),
            generation = generation,
            current = state.generation,
            "dropping stale result"
        );
        return;
    }
    if let Some(slot) = state.displays.iter_mut().find(|d| d.id() == resolved.id()) {
        *slot = resolved.clone();
    }
    let update = DisplayUpdate {
        generation,
        id: resolved.id().to_string(),
        display: resolved,
    };
    if updates.send(update).is_err() {
        debug!("update receiver dropped");
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        for handle in self.scheduled.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_transport::OfflineConnector;
    use sniffer_types::Settings;

    fn orchestrator() -> (Orchestrator, UnboundedReceiver<DisplayUpdate>) {
        let context = DispatchContext::new(Arc::new(Settings::default()), Arc::new(OfflineConnector));
        let (orchestrator, updates) = Orchestrator::new(context);
        (orchestrator.with_resolve_delay(Duration::from_millis(1)), updates)
    }

    #[tokio::test]
    async fn test_generation_counts_inputs() {
        let (mut orchestrator, _updates) = orchestrator();
        assert_eq!(orchestrator.generation(), 0);
        assert!(orchestrator.process_input("").await.unwrap().is_empty());
        assert_eq!(orchestrator.generation(), 1);
        orchestrator.process_input("abcd").await.unwrap();
        assert_eq!(orchestrator.generation(), 2);
        assert_eq!(orchestrator.current_input(), "abcd");
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let (mut orchestrator, _updates) = orchestrator();
        let displays = orchestrator.process_input("  abcd\n").await.unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].id(), "abcd#hex-summary");
        assert_eq!(orchestrator.current(), displays);
    }

    #[tokio::test]
    async fn test_offline_lookup_resolves_to_error() {
        let (mut orchestrator, mut updates) = orchestrator();
        let input = "123R";
        let placeholders = orchestrator.process_input(input).await.unwrap();
        let rise_networks = orchestrator.context().settings.rise_networks.len();
        assert_eq!(placeholders.len(), rise_networks);
        assert!(placeholders.iter().all(|d| d.data.is_pending()));

        for _ in 0..rise_networks {
            let update = updates.recv().await.unwrap();
            assert_eq!(update.generation, 1);
            assert!(matches!(update.display.data, DisplayData::Error(_)));
        }
        assert_eq!(orchestrator.pending_count(), 0);
    }
}

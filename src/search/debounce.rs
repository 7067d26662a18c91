//! Debounced query input.
//!
//! Raw keystrokes go in; a query comes out only after the input has been
//! quiet for the configured period. Clearing the input is emitted at once.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Sending half of a debouncer. Dropping it ends the debounce task, after
/// any pending value has been flushed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    input: mpsc::UnboundedSender<String>,
}

impl Debouncer {
    /// Start a debounce task. Settled queries arrive on the returned receiver.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input, mut raw) = mpsc::unbounded_channel::<String>();
        let (settled, output) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let mut pending: Option<(String, Instant)> = None;
            loop {
                let deadline = pending.as_ref().map(|(_, at)| *at);
                tokio::select! {
                    next = raw.recv() => match next {
                        Some(text) if text.trim().is_empty() => {
                            pending = None;
                            if settled.send(String::new()).is_err() {
                                break;
                            }
                        }
                        Some(text) => pending = Some((text, Instant::now() + quiet)),
                        None => {
                            if let Some((text, _)) = pending.take() {
                                let _ = settled.send(text);
                            }
                            break;
                        }
                    },
                    _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                        if let Some((text, _)) = pending.take()
                            && settled.send(text).is_err()
                        {
                            break;
                        }
                    }
                }
            }
        });

        (Self { input }, output)
    }

    /// Feed the current input value. Returns `false` once the task has stopped.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.input.send(text.into()).is_ok()
    }
}

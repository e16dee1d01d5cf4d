//! Card discovery loop
//!
//! The listener polls a [`TargetDiscovery`] for presented cards, runs one
//! [`Transaction`](crate::Transaction) per target and hands every card it
//! reads to a channel. Failed handshakes are logged and skipped. Discovery
//! failures are retried with backoff until the [`RetryPolicy`] gives up.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use emvtap_apdu_core::TargetDiscovery;
use tracing::{debug, info, warn};

use crate::config::{RetryPolicy, TerminalConfig};
use crate::error::{Error, Result};
use crate::transaction::read_card;
use crate::types::Card;
use crate::unpredictable::{ThreadRandom, UnpredictableNumberSource};

/// Polls for cards and reads each one
#[derive(Debug)]
pub struct Listener<D, U = ThreadRandom> {
    discovery: D,
    terminal: TerminalConfig,
    retry: RetryPolicy,
    unpredictable: U,
    failures: u32,
}

impl<D: TargetDiscovery> Listener<D> {
    /// Create a listener drawing unpredictable numbers from the thread RNG
    pub fn new(discovery: D, terminal: TerminalConfig) -> Self {
        Self {
            discovery,
            terminal,
            retry: RetryPolicy::default(),
            unpredictable: ThreadRandom,
            failures: 0,
        }
    }
}

impl<D, U> Listener<D, U>
where
    D: TargetDiscovery,
    U: UnpredictableNumberSource,
{
    /// Set the backoff applied to discovery failures
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use another unpredictable number source
    pub fn with_unpredictable_source<V: UnpredictableNumberSource>(
        self,
        unpredictable: V,
    ) -> Listener<D, V> {
        Listener {
            discovery: self.discovery,
            terminal: self.terminal,
            retry: self.retry,
            unpredictable,
            failures: self.failures,
        }
    }

    /// Run the loop on the current thread
    ///
    /// Returns `Ok` once `cards` has no receiver left, or
    /// [`Error::RetriesExhausted`] when discovery keeps failing.
    pub fn run(mut self, cards: &Sender<Card>) -> Result<()> {
        loop {
            for target in self.poll_targets()? {
                let Some(card) = self.read_target(target) else {
                    continue;
                };
                if cards.send(card).is_err() {
                    debug!("Card receiver dropped, stopping listener");
                    return Ok(());
                }
            }
        }
    }

    /// Poll until one card is read
    ///
    /// Discovery failures back off under the same [`RetryPolicy`] as
    /// [`run`](Self::run). Other targets found by the same poll are released.
    pub fn next_card(&mut self) -> Result<Card> {
        loop {
            for target in self.poll_targets()? {
                if let Some(card) = self.read_target(target) {
                    return Ok(card);
                }
            }
        }
    }

    /// One discovery poll; failures sleep per the retry policy and yield no targets
    fn poll_targets(&mut self) -> Result<Vec<D::Target>> {
        match self.discovery.poll_targets() {
            Ok(targets) => {
                self.failures = 0;
                Ok(targets)
            }
            Err(e) => {
                self.failures += 1;
                if self.failures >= self.retry.max_consecutive_failures {
                    warn!(error = %e, failures = self.failures, "Giving up on target discovery");
                    return Err(Error::RetriesExhausted {
                        attempts: self.failures,
                        last: e,
                    });
                }

                let delay = self.retry.delay_for(self.failures);
                warn!(error = %e, failures = self.failures, ?delay, "Failed to poll for targets");
                thread::sleep(delay);
                Ok(Vec::new())
            }
        }
    }

    fn read_target(&mut self, target: D::Target) -> Option<Card> {
        debug!(?target, "Target selected");

        // The target is dropped, and so deselected, when this returns
        let card = match read_card(target, &self.terminal, &mut self.unpredictable) {
            Ok(card) => card,
            Err(e) => {
                warn!(error = %e, "Failed to process target");
                return None;
            }
        };

        info!(
            "{} card detected ****{} {}/{}",
            card.label,
            card.pan_suffix(),
            card.expiry_month,
            card.expiry_year
        );
        Some(card)
    }
}

impl<D, U> Listener<D, U>
where
    D: TargetDiscovery + 'static,
    U: UnpredictableNumberSource + Send + 'static,
{
    /// Run the loop on its own thread
    ///
    /// Cards arrive on the returned receiver; dropping it stops the loop after
    /// the next card is read.
    pub fn spawn(self) -> (Receiver<Card>, JoinHandle<Result<()>>) {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        let handle = thread::spawn(move || self.run(&sender));
        (receiver, handle)
    }
}

//! Asynchronous domain events.
//!
//! Generated event messages publish themselves through a [`Publisher`] under
//! a fixed event name, and generated `*Handler` wrappers implement
//! [`EventHandler`] so a transport can deliver raw [`Event`]s to typed
//! functions.
//!
//! The outcome of a delivery is an [`EventResult`]:
//!
//! - [`EventResult::Processed`] - done
//! - [`EventResult::Retry`] - deliver again later
//! - [`EventResult::Discard`] - drop for good; never redelivered
//!
//! [`MemoryBus`] is an in-process transport implementing both sides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, mpsc, watch};

use crate::error::{Error, ErrorKind};

/// A raw event as carried by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name the payload was published under.
    pub name: String,
    /// JSON payload.
    pub payload: Bytes,
}

impl Event {
    /// Decodes the payload.
    ///
    /// ## Errors
    ///
    /// Returns a `bad_request` error when the payload does not decode into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.payload)
            .map_err(|e| Error::wrap(e, ErrorKind::BadRequest, "invalid event payload"))
    }
}

/// Outcome of delivering one event to one handler.
#[derive(Debug)]
pub enum EventResult {
    Processed,
    Retry(Error),
    Discard(Error),
}

impl EventResult {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed)
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Self::Discard(_))
    }
}

/// Sending side of an event transport.
pub trait Publisher: Send + Sync {
    /// Hands `payload` to the transport under `name`.
    ///
    /// Implementations must not wait for subscribers to process the event.
    fn publish(&self, name: &str, payload: Bytes) -> Result<(), Error>;
}

/// A handler for one event name.
pub trait EventHandler: Send + Sync {
    /// The event name this handler subscribes to.
    fn event_name(&self) -> &str;

    /// Handles one delivery.
    fn handle_event(&self, event: &Event) -> EventResult;
}

/// Serializes `event` and publishes it under `name`.
///
/// Used by generated `publish` methods after validation has passed.
/// Transport errors are returned unchanged.
pub fn publish<T: Serialize + ?Sized>(
    publisher: &dyn Publisher,
    name: &str,
    event: &T,
) -> Result<(), Error> {
    let payload = serde_json::to_vec(event)
        .map_err(|e| Error::wrap(e, ErrorKind::Internal, "failed to encode event"))?;
    publisher.publish(name, Bytes::from(payload))
}

/// Configuration for [`MemoryBus`].
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Total delivery attempts per handler before a retried event is dropped.
    pub max_attempts: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Delivery counters for a [`MemoryBus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    /// Events accepted by `publish`.
    pub published: usize,
    /// Deliveries that returned `Processed`.
    pub processed: usize,
    /// Deliveries that returned `Retry` and were queued again.
    pub retried: usize,
    /// Deliveries that returned `Discard`.
    pub discarded: usize,
    /// Deliveries dropped after exhausting `max_attempts`.
    pub exhausted: usize,
}

struct Delivery {
    event: Event,
    handler: Arc<dyn EventHandler>,
    attempt: u32,
}

#[derive(Default)]
struct Counters {
    published: AtomicUsize,
    processed: AtomicUsize,
    retried: AtomicUsize,
    discarded: AtomicUsize,
    exhausted: AtomicUsize,
}

/// An in-process event transport.
///
/// `publish` fans the event out to the handlers subscribed at that moment
/// and returns immediately. Deliveries are processed by [`MemoryBus::run`]
/// (a long-lived task, stopped with [`MemoryBus::shutdown`]) or
/// [`MemoryBus::drain`] (everything queued so far).
///
/// ## Examples
///
/// ```
/// use jrpc::bytes::Bytes;
/// use jrpc::firehose::{BusConfig, Event, EventHandler, EventResult, MemoryBus, Publisher};
///
/// struct Print;
///
/// impl EventHandler for Print {
///     fn event_name(&self) -> &str {
///         "set-scene"
///     }
///
///     fn handle_event(&self, _event: &Event) -> EventResult {
///         EventResult::Processed
///     }
/// }
///
/// let bus = MemoryBus::new(BusConfig::default());
/// bus.subscribe(Print);
/// bus.publish("set-scene", Bytes::from_static(b"{}")).unwrap();
///
/// assert_eq!(bus.drain(), 1);
/// assert_eq!(bus.stats().processed, 1);
/// ```
pub struct MemoryBus {
    config: BusConfig,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    sender: mpsc::UnboundedSender<Delivery>,
    receiver: Mutex<mpsc::UnboundedReceiver<Delivery>>,
    shutdown: watch::Sender<bool>,
    counters: Counters,
}

impl MemoryBus {
    /// Creates a bus with no subscribers.
    pub fn new(config: BusConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            config,
            handlers: RwLock::new(HashMap::new()),
            sender,
            receiver: Mutex::new(receiver),
            shutdown: watch::Sender::new(false),
            counters: Counters::default(),
        }
    }

    /// Registers `handler` under its event name.
    pub fn subscribe<H: EventHandler + 'static>(&self, handler: H) {
        let name = handler.event_name().to_string();
        tracing::debug!(event = %name, "Subscribed handler");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Processes every delivery queued so far, including retries queued
    /// while draining. Returns the number of deliveries handled.
    ///
    /// Returns `0` without doing anything while [`MemoryBus::run`] owns the
    /// queue.
    pub fn drain(&self) -> usize {
        let Ok(mut receiver) = self.receiver.try_lock() else {
            return 0;
        };

        let mut handled = 0;
        while let Ok(delivery) = receiver.try_recv() {
            self.deliver(delivery);
            handled += 1;
        }
        handled
    }

    /// Processes deliveries until [`MemoryBus::shutdown`] is called.
    ///
    /// The task holds the bus, so dropping other handles does not end it.
    /// Deliveries still queued at shutdown stay queued and can be handled
    /// with [`MemoryBus::drain`].
    pub async fn run(self: Arc<Self>) {
        let mut shutdown = self.shutdown.subscribe();
        let mut receiver = self.receiver.lock().await;
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.changed() => {}
                delivery = receiver.recv() => match delivery {
                    Some(delivery) => self.deliver(delivery),
                    None => break,
                },
            }
        }
        tracing::debug!("Event bus stopped");
    }

    /// Stops every [`MemoryBus::run`] task. Publishing keeps working.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Snapshot of the delivery counters.
    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.counters.published.load(Ordering::Relaxed),
            processed: self.counters.processed.load(Ordering::Relaxed),
            retried: self.counters.retried.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
            exhausted: self.counters.exhausted.load(Ordering::Relaxed),
        }
    }

    fn deliver(&self, delivery: Delivery) {
        let name = delivery.event.name.as_str();
        match delivery.handler.handle_event(&delivery.event) {
            EventResult::Processed => {
                self.counters.processed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(event = %name, attempt = delivery.attempt, "Processed event");
            }
            EventResult::Discard(err) => {
                self.counters.discarded.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(event = %name, error = %err, "Discarded event");
            }
            EventResult::Retry(err) if delivery.attempt < self.config.max_attempts => {
                self.counters.retried.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(event = %name, attempt = delivery.attempt, error = %err, "Retrying event");
                let retry = Delivery {
                    attempt: delivery.attempt + 1,
                    ..delivery
                };
                // The receiver lives as long as the bus, so this cannot fail.
                let _ = self.sender.send(retry);
            }
            EventResult::Retry(err) => {
                self.counters.exhausted.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(event = %name, attempts = delivery.attempt, error = %err, "Giving up on event");
            }
        }
    }
}

impl Publisher for MemoryBus {
    fn publish(&self, name: &str, payload: Bytes) -> Result<(), Error> {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default();

        self.counters.published.fetch_add(1, Ordering::Relaxed);
        if handlers.is_empty() {
            tracing::debug!(event = %name, "No subscribers for event");
        }

        let event = Event {
            name: name.to_string(),
            payload,
        };
        for handler in handlers {
            self.sender
                .send(Delivery {
                    event: event.clone(),
                    handler,
                    attempt: 1,
                })
                .map_err(|_| Error::unavailable("event bus is closed"))?;
        }
        Ok(())
    }
}

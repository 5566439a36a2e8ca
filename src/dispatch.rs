use heapless::Vec;

use crate::{Channel, Event};

/// The handler registry is full; raise the dispatcher's capacity parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryFull;

/// Process-wide event registry mapping `(kind, channel)` keys to handlers.
///
/// Handlers are appended in subscription order and invoked in that order;
/// subscribing the same handler twice delivers it twice. Entries are never
/// removed; subscriptions live as long as the process. Delivery is
/// synchronous on the calling poll task: a handler that blocks stalls all
/// further polling, so handler work must stay bounded by convention.
///
/// The capacity `N` bounds the total number of subscriptions; no allocator
/// is involved.
pub struct Dispatcher<'h, const N: usize = 8> {
  handlers: Vec<(Event, &'h dyn Fn(Event)), N>,
}

impl<'h, const N: usize> Dispatcher<'h, N> {
  pub const fn new() -> Self {
    Self { handlers: Vec::new() }
  }

  /// Register a handler for an exact event key.
  ///
  /// Touch keys carry their channel, so a handler subscribed to
  /// `Event::Touched(ch)` fires only for that channel's touch edges.
  pub fn subscribe(&mut self, key: Event, handler: &'h dyn Fn(Event)) -> Result<(), RegistryFull> {
    self.handlers.push((key, handler)).map_err(|_| RegistryFull)
  }

  /// Run when a channel's touch edge fires.
  pub fn on_touched(&mut self, channel: Channel, handler: &'h dyn Fn(Event)) -> Result<(), RegistryFull> {
    self.subscribe(Event::Touched(channel), handler)
  }

  /// Run when a channel's release edge fires.
  pub fn on_released(&mut self, channel: Channel, handler: &'h dyn Fn(Event)) -> Result<(), RegistryFull> {
    self.subscribe(Event::Released(channel), handler)
  }

  /// Run when the presence detector reports an approach.
  pub fn on_presence(&mut self, handler: &'h dyn Fn(Event)) -> Result<(), RegistryFull> {
    self.subscribe(Event::PresenceDetected, handler)
  }

  /// Deliver an event to every matching handler, in registration order,
  /// synchronously on the calling task. The event itself is passed to each
  /// handler so the triggering channel is always retrievable.
  pub fn dispatch(&self, event: Event) {
    log::trace!("dispatching {:?}", event);
    for (key, handler) in &self.handlers {
      if *key == event {
        handler(event);
      }
    }
  }

  /// Number of registered subscriptions.
  pub fn len(&self) -> usize {
    self.handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handlers.is_empty()
  }
}

impl<'h, const N: usize> Default for Dispatcher<'h, N> {
  fn default() -> Self {
    Self::new()
  }
}

//! Polling edge detector turning raw touch status words into per-channel
//! touched/released events.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{defs::TOUCH_POLL_MS, edges, Dispatcher, Error, Mpr121, TouchStatus};

/// Edge detector over the controller's 12 touch channels.
///
/// Owns the [`Mpr121`] driver plus the previous status snapshot. Each poll
/// reads the current status word, diffs it bit-by-bit against the previous
/// one, and delivers the resulting edge events through the dispatcher in
/// ascending channel order. The previous snapshot is exclusively owned here
/// and updated once per poll; no other task reads it.
pub struct TouchKeys<I, D> {
  driver: Mpr121<I, D>,
  previous: TouchStatus,
}

impl<I, D> TouchKeys<I, D> {
  pub fn new(driver: Mpr121<I, D>) -> Self {
    Self { driver, previous: TouchStatus::default() }
  }

  /// Consume the detector and return the underlying driver.
  pub fn into_inner(self) -> Mpr121<I, D> {
    self.driver
  }

  /// The most recently completed status snapshot.
  pub fn last_status(&self) -> TouchStatus {
    self.previous
  }
}

impl<I, E, D> TouchKeys<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Bring up the controller; see [`Mpr121::initialize`].
  ///
  /// Safe to call repeatedly: only the first call configures the device.
  pub async fn initialize(&mut self) -> Result<bool, Error<E>> {
    self.driver.initialize().await
  }

  /// One poll cycle: read the status word, dispatch the edges, store the
  /// snapshot for the next cycle.
  pub async fn poll<const N: usize>(&mut self, dispatcher: &Dispatcher<'_, N>) -> Result<(), Error<E>> {
    let current = self.driver.touch_status().await?;
    for event in edges(self.previous, current) {
      dispatcher.dispatch(event);
    }
    self.previous = current;
    Ok(())
  }

  /// Poll forever at the fixed interval.
  ///
  /// Intended as a long-lived background task; it suspends only at the sleep
  /// between polls and returns only on a bus fault. Events from consecutive
  /// polls are strictly ordered: a touch and a release observed in two
  /// separate cycles always yield two separate events, never coalesced.
  pub async fn run<const N: usize>(&mut self, dispatcher: &Dispatcher<'_, N>) -> Result<(), Error<E>> {
    loop {
      self.poll(dispatcher).await?;
      self.driver.delay.delay_ms(TOUCH_POLL_MS).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use core::cell::RefCell;

  use embassy_futures::block_on;
  use embedded_hal_mock::eh1::i2c::Mock;

  use super::*;
  use crate::testutil::{initialize_writes, read_status, NoDelay};
  use crate::{Channel, Config, Event};

  fn ch(index: u8) -> Channel {
    Channel::new(index).unwrap()
  }

  #[test]
  fn initialize_runs_the_bringup_sequence_once() {
    let config = Config::default();
    // One full sequence ending in the 0xCC start byte, and nothing more even
    // though initialize is called twice.
    let transactions = initialize_writes(&config);
    assert_eq!(*transactions.last().unwrap(), crate::testutil::write(0x5E, 0xCC));

    let mut mock = Mock::new(&transactions);
    let mut keys = TouchKeys::new(Mpr121::new(mock.clone(), NoDelay, config));

    block_on(async {
      assert!(keys.initialize().await.unwrap());
      assert!(!keys.initialize().await.unwrap());
    });
    mock.done();
  }

  #[test]
  fn poll_dispatches_edges_and_stores_the_snapshot() {
    let transactions = vec![read_status(0b0000_0000_0101), read_status(0b0000_0000_0100)];
    let mut mock = Mock::new(&transactions);
    let mut keys = TouchKeys::new(Mpr121::new(mock.clone(), NoDelay, Config::default()));

    let seen = RefCell::new(Vec::new());
    let handler = |event: Event| seen.borrow_mut().push(event);

    let mut dispatcher = Dispatcher::<4>::new();
    dispatcher.on_touched(ch(0), &handler).unwrap();
    dispatcher.on_touched(ch(2), &handler).unwrap();
    dispatcher.on_released(ch(0), &handler).unwrap();

    block_on(async {
      keys.poll(&dispatcher).await.unwrap();
      keys.poll(&dispatcher).await.unwrap();
    });
    mock.done();

    assert_eq!(
      *seen.borrow(),
      vec![Event::Touched(ch(0)), Event::Touched(ch(2)), Event::Released(ch(0))]
    );
    assert!(keys.last_status().is_touched(ch(2)));
    assert!(!keys.last_status().is_touched(ch(0)));
  }

  #[test]
  fn sustained_touch_is_not_redelivered() {
    let mask = ch(4).mask();
    let transactions = vec![read_status(mask), read_status(mask), read_status(mask), read_status(0)];
    let mut mock = Mock::new(&transactions);
    let mut keys = TouchKeys::new(Mpr121::new(mock.clone(), NoDelay, Config::default()));

    let seen = RefCell::new(Vec::new());
    let handler = |event: Event| seen.borrow_mut().push(event);

    let mut dispatcher = Dispatcher::<4>::new();
    dispatcher.on_touched(ch(4), &handler).unwrap();
    dispatcher.on_released(ch(4), &handler).unwrap();

    block_on(async {
      for _ in 0..4 {
        keys.poll(&dispatcher).await.unwrap();
      }
    });
    mock.done();

    assert_eq!(*seen.borrow(), vec![Event::Touched(ch(4)), Event::Released(ch(4))]);
  }
}

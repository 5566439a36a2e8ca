//! Dual-mode presence detector.
//!
//! The board ships in two hardware variants: one with a digital proximity
//! module on a GPIO pin, one with an I²C rangefinder. A single reference
//! reading taken at startup picks the mode, binary when the rangefinder
//! reports zero, ranged otherwise. The choice is permanent for the life of
//! the detector.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::defs::{PRESENCE_DELTA, PRESENCE_HOLD_MS, PRESENCE_POLL_MS};
use crate::{Dispatcher, Event};

/// Distance sensor abstraction for the ranged presence mode.
///
/// Implementations return a filtered distance reading in sensor units; the
/// detector only compares readings against its own baseline, so the unit
/// does not matter as long as it is consistent.
#[allow(async_fn_in_trait)]
pub trait Rangefinder {
  type Error;

  /// Take one distance reading.
  async fn distance(&mut self) -> Result<u16, Self::Error>;
}

/// Errors raised by the presence detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresenceError<RE, PE> {
  /// The rangefinder failed to produce a reading.
  Range(RE),
  /// The proximity pin could not be sampled.
  Pin(PE),
}

/// Presence detector over a proximity pin and a rangefinder.
///
/// Call [`PresenceDetector::initialize`] once to take the reference reading
/// and latch the mode, then [`PresenceDetector::run`] as a long-lived task.
/// In both modes an approach raises exactly one [`Event::PresenceDetected`];
/// re-detection requires the subject to leave first. The ranged mode
/// additionally holds a detection for a minimum dwell time so a subject
/// hovering at the threshold cannot retrigger in a tight cycle.
pub struct PresenceDetector<R, P, D> {
  range: R,
  pin: P,
  delay: D,
  mode: Option<Mode>,
  now_ms: u64,
}

impl<R, P, D> PresenceDetector<R, P, D> {
  pub fn new(range: R, pin: P, delay: D) -> Self {
    Self { range, pin, delay, mode: None, now_ms: 0 }
  }
}

impl<R, P, D> PresenceDetector<R, P, D>
where
  R: Rangefinder,
  P: InputPin,
  D: DelayNs,
{
  /// Take the reference reading and latch the sensing mode.
  ///
  /// Returns `true` if the mode was latched by this call, `false` if a
  /// previous call already did. The reference reading doubles as the ranged
  /// mode's baseline: detection means dropping measurably below it.
  pub async fn initialize(&mut self) -> Result<bool, PresenceError<R::Error, P::Error>> {
    if self.mode.is_some() {
      return Ok(false);
    }

    let reference = self.range.distance().await.map_err(PresenceError::Range)?;
    if reference == 0 {
      log::debug!("presence sensing via proximity pin");
      self.mode = Some(Mode::Binary(BinaryPresence::default()));
    } else {
      log::debug!("presence sensing via rangefinder, baseline {}", reference);
      self.mode = Some(Mode::Ranged(RangedPresence::new(reference)));
    }
    Ok(true)
  }

  /// One poll cycle: sample the latched sensor, dispatch any resulting
  /// event, and advance the elapsed-time accumulator by one interval.
  ///
  /// Elapsed time is counted in poll intervals rather than read from a
  /// clock, so the dwell window needs no time source. A no-op before the
  /// mode has been latched.
  pub async fn poll<const N: usize>(
    &mut self,
    dispatcher: &Dispatcher<'_, N>,
  ) -> Result<(), PresenceError<R::Error, P::Error>> {
    let event = match self.mode.as_mut() {
      None => None,
      Some(Mode::Binary(state)) => {
        let active = self.pin.is_low().map_err(PresenceError::Pin)?;
        state.step(active)
      }
      Some(Mode::Ranged(state)) => {
        let distance = self.range.distance().await.map_err(PresenceError::Range)?;
        state.step(distance, self.now_ms)
      }
    };
    if let Some(event) = event {
      dispatcher.dispatch(event);
    }

    self.now_ms += u64::from(PRESENCE_POLL_MS);
    Ok(())
  }

  /// Poll the latched sensor forever at the fixed interval.
  ///
  /// Latches the mode first if [`PresenceDetector::initialize`] has not run
  /// yet. Both modes sleep between polls.
  pub async fn run<const N: usize>(
    &mut self,
    dispatcher: &Dispatcher<'_, N>,
  ) -> Result<(), PresenceError<R::Error, P::Error>> {
    self.initialize().await?;
    loop {
      self.poll(dispatcher).await?;
      self.delay.delay_ms(PRESENCE_POLL_MS).await;
    }
  }
}

enum Mode {
  Binary(BinaryPresence),
  Ranged(RangedPresence),
}

/// Level-to-edge latch for the proximity pin. The pin is active low.
#[derive(Debug, Default)]
struct BinaryPresence {
  detected: bool,
}

impl BinaryPresence {
  fn step(&mut self, active: bool) -> Option<Event> {
    if active {
      if !self.detected {
        self.detected = true;
        return Some(Event::PresenceDetected);
      }
    } else {
      self.detected = false;
    }
    None
  }
}

/// Baseline-relative latch for the rangefinder.
///
/// A reading below `baseline - 5` counts as an approach. Release needs both
/// the dwell window elapsed since detection and a reading back at or above
/// the threshold; until then further near readings are absorbed.
#[derive(Debug)]
struct RangedPresence {
  baseline: u16,
  detected: bool,
  since_ms: u64,
}

impl RangedPresence {
  fn new(baseline: u16) -> Self {
    Self { baseline, detected: false, since_ms: 0 }
  }

  fn step(&mut self, distance: u16, now_ms: u64) -> Option<Event> {
    let near = distance < self.baseline.saturating_sub(PRESENCE_DELTA);

    if !self.detected {
      if near {
        self.detected = true;
        self.since_ms = now_ms;
        return Some(Event::PresenceDetected);
      }
    } else if !near && now_ms.saturating_sub(self.since_ms) >= PRESENCE_HOLD_MS {
      self.detected = false;
    }
    None
  }
}

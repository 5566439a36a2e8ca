//! Presence example: one detector task serving either hardware variant.
#![allow(unused)]
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use smarthome_sense::{Dispatcher, Event, PresenceDetector, PresenceError, Rangefinder};

#[allow(dead_code)]
async fn main_async<R, P, D>(range: R, pin: P, delay: D) -> Result<(), PresenceError<R::Error, P::Error>>
where
  R: Rangefinder,
  P: InputPin,
  D: DelayNs,
{
  let announce = |event: Event| {
    let _ = event;
    // wake the display
  };

  let mut dispatcher = Dispatcher::<2>::new();
  dispatcher.on_presence(&announce).unwrap();

  // The mode (pin or rangefinder) is latched from one reference reading.
  let mut detector = PresenceDetector::new(range, pin, delay);
  detector.run(&dispatcher).await
}

fn main() {}

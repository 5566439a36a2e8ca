//! Touch key example: subscribe per-channel handlers and poll forever.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use smarthome_sense::{Channel, Config, Dispatcher, Event, Mpr121, TouchKeys};

#[allow(dead_code)]
async fn main_async<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), smarthome_sense::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  let toggle_lamp = |event: Event| {
    let _ = event;
    // drive the relay
  };
  let all_released = |event: Event| {
    let _ = event;
    // arm the idle timer
  };

  let mut dispatcher = Dispatcher::<8>::new();
  dispatcher.on_touched(Channel::new(0).unwrap(), &toggle_lamp).unwrap();
  dispatcher.on_released(Channel::new(0).unwrap(), &all_released).unwrap();

  let mut keys = TouchKeys::new(Mpr121::new(i2c, delay, Config::default()));
  keys.initialize().await?;
  keys.run(&dispatcher).await
}

fn main() {}

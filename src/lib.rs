#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` sensor-to-event layer for a small home-automation demo
//! board, built around the NXP MPR121 12-channel capacitive touch controller
//! and a presence/range sensor.
//!
//! The crate converts raw sensor readings into edge-triggered events and
//! delivers them synchronously to registered handlers:
//!
//! - [`Mpr121`] encodes the controller's configuration protocol (baseline
//!   filters, thresholds, autoconfig, calibration lock) into I²C register
//!   writes, with a [`Halted`] capability token so configuration can only
//!   happen while capture is stopped
//! - [`TouchKeys`] polls the 12-bit touch status word and raises
//!   [`Event::Touched`] / [`Event::Released`] once per transition, never on
//!   sustained contact
//! - [`Dispatcher`] maps `(event kind, channel)` keys to handler lists and
//!   invokes them in registration order
//! - [`PresenceDetector`] polls either a digital proximity pin or a
//!   rangefinder (picked once at startup from a reference reading) and raises
//!   [`Event::PresenceDetected`] on approach
//! - Uses `embedded-hal` / `embedded-hal-async` 1.0 traits so the layer works
//!   across MCU families
//!
//! ```no_run
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use smarthome_sense::{Config, Dispatcher, Event, Mpr121, TouchKeys};
//!
//! async fn example<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), smarthome_sense::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//! {
//!   let mut dispatcher = Dispatcher::<8>::new();
//!   let on_key = |event: Event| { /* drive an actuator */ };
//!   dispatcher.on_touched(smarthome_sense::Channel::new(3).unwrap(), &on_key).ok();
//!
//!   let mut keys = TouchKeys::new(Mpr121::new(i2c, delay, Config::default()));
//!   keys.initialize().await?;
//!   keys.run(&dispatcher).await
//! }
//! ```
//!
//! Both polling loops are long-lived tasks meant for a cooperative
//! single-threaded executor; only one runs at a time, so the dispatcher needs
//! no locking. Deployments that poll from parallel threads must wrap each bus
//! transaction and the dispatcher in their own mutual exclusion. Handlers run
//! synchronously on the polling task; a handler that blocks stalls all
//! further polling, so keep handler work bounded.

mod config;
mod control;
mod defs;
mod dispatch;
mod event;
mod keys;
mod presence;
#[cfg(test)]
mod testutil;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use config::*;
pub use control::*;
pub use defs::DEFAULT_ADDRESS;
use defs::*;
pub use dispatch::*;
pub use event::*;
pub use keys::*;
pub use presence::*;

/// Errors that can occur while talking to the touch controller.
///
/// Any transport-level failure is treated as fatal: a fault in the middle of
/// the configuration sequence leaves the device in an unknown state that a
/// silent retry cannot repair, so faults propagate to the caller unretried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
}

/// Register-level driver for the MPR121 capacitive touch controller.
///
/// The driver owns the I²C peripheral and a delay provider and exposes the
/// small operation set the board needs: soft reset, capture stop/start, the
/// fixed configuration profile, and touch status reads. Create an instance
/// with [`Mpr121::new`], then call [`Mpr121::initialize`] to push the staged
/// [`Config`] to the device and re-enable capture.
pub struct Mpr121<I, D> {
  pub(crate) i2c: I,
  pub(crate) delay: D,
  pub(crate) address: u8,
  pub(crate) config: Config,
  pub(crate) initialized: bool,
}

impl<I, D> Mpr121<I, D> {
  /// Create a new driver instance at the factory-default address.
  ///
  /// The configuration is not transmitted to the device until
  /// [`Mpr121::initialize`] is called.
  pub fn new(i2c: I, delay: D, config: Config) -> Self {
    Self { i2c, delay, address: DEFAULT_ADDRESS, config, initialized: false }
  }

  /// Use a non-default I²C address (ADDR pin strapped high).
  pub fn with_address(mut self, address: u8) -> Self {
    self.address = address;
    self
  }

  /// The staged configuration profile.
  pub fn config(&self) -> &Config {
    &self.config
  }
}

impl<I, E, D> Mpr121<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Initialize the touch controller.
  ///
  /// Performs the full bring-up sequence: soft reset, capture stop, staged
  /// configuration, default thresholds, then capture restart with the staged
  /// run-control word. Returns `true` if the device was configured, `false`
  /// if a previous call already did; repeated initialization is a no-op and
  /// never reconfigures the device.
  pub async fn initialize(&mut self) -> Result<bool, Error<E>> {
    if self.initialized {
      return Ok(false);
    }

    log::debug!("configuring touch controller at {:#04x}", self.address);

    let config = self.config;
    self.reset().await?;

    let mut halted = self.stop().await?;
    halted.apply(&config).await?;
    halted.start(config.run).await?;

    self.initialized = true;
    Ok(true)
  }

  /// Issue the soft-reset command and wait out the settle time.
  ///
  /// Clears all device-internal calibration state.
  pub async fn reset(&mut self) -> Result<(), Error<E>> {
    self.write_register(Reg::SoftReset, SOFT_RESET_MAGIC).await?;
    self.delay.delay_ms(RESET_SETTLE_MS).await;
    Ok(())
  }

  /// Read the full touch status word.
  ///
  /// A single read returns a complete snapshot; the low 12 bits carry the
  /// channel states, the upper bits are reserved.
  pub async fn touch_status(&mut self) -> Result<TouchStatus, Error<E>> {
    let mut buf = [0u8; 2];
    self
      .i2c
      .write_read(self.address, &[Reg::TouchStatus.into()], &mut buf)
      .await
      .map_err(Error::I2c)?;
    Ok(TouchStatus::from_raw(u16::from_le_bytes(buf)))
  }

  pub(crate) async fn write_register(&mut self, register: impl Into<u8>, value: u8) -> Result<(), Error<E>> {
    self.i2c.write(self.address, &[register.into(), value]).await.map_err(Error::I2c)
  }
}

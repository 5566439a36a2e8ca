use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{defs::Reg, Error, Mpr121};

impl<I, E, D> Mpr121<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Halt capture by writing zero to the run-control register.
  ///
  /// The device only accepts configuration writes while stopped, so all
  /// configuration methods live on the returned [`Halted`] token. Capture
  /// resumes when the token is consumed by [`Halted::start`].
  pub async fn stop(&mut self) -> Result<Halted<'_, I, D>, Error<E>> {
    self.write_register(Reg::RunControl, 0x00).await?;
    Ok(Halted { dev: self })
  }
}

/// Proof that capture is stopped and the device accepts configuration writes.
pub struct Halted<'a, I, D> {
  pub(crate) dev: &'a mut Mpr121<I, D>,
}

impl<'a, I, E, D> Halted<'a, I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Single register write, no validation; the fixed configuration table is
  /// trusted to supply sane values.
  pub async fn configure(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
    self.dev.write_register(register, value).await
  }

  /// Write the same touch/release threshold pair to all 12 channels.
  ///
  /// Channel *k*'s registers sit at a fixed `+2k` offset from the channel-0
  /// pair, giving 24 distinct register writes.
  pub async fn configure_thresholds(&mut self, touch: u8, release: u8) -> Result<(), Error<E>> {
    for k in 0..12u8 {
      self.configure(Reg::TouchThreshold0 as u8 + 2 * k, touch).await?;
      self.configure(Reg::ReleaseThreshold0 as u8 + 2 * k, release).await?;
    }
    Ok(())
  }

  /// Re-enable capture with the given channel count and calibration policy,
  /// consuming the halted token.
  pub async fn start(self, run: RunControl) -> Result<(), Error<E>> {
    self.dev.write_register(Reg::RunControl, run.into()).await
  }
}

/// Baseline calibration policy, bits 7:6 of the run-control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CalibrationLock {
  /// Baseline tracks ambient drift from its current value.
  Tracking = 0b00,
  /// Baseline registers are frozen at their current values.
  Locked = 0b01,
  /// Tracking enabled, baseline seeded from the 5 MSBs of the first reading.
  TrackingSeedPartial = 0b10,
  /// Tracking enabled, baseline fully initialized from the first reading.
  TrackingSeedFull = 0b11,
}

impl From<CalibrationLock> for u8 {
  fn from(v: CalibrationLock) -> Self {
    v as u8
  }
}

impl TryFrom<u8> for CalibrationLock {
  type Error = ();

  fn try_from(bits: u8) -> Result<Self, Self::Error> {
    match bits & 0b11 {
      0b00 => Ok(Self::Tracking),
      0b01 => Ok(Self::Locked),
      0b10 => Ok(Self::TrackingSeedPartial),
      0b11 => Ok(Self::TrackingSeedFull),
      _ => Err(()),
    }
  }
}

/// Proximity channel selection, bits 5:4 of the run-control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Proximity {
  Disabled = 0b00,
  /// Combine channels 0..=1 into the proximity channel.
  FirstTwo = 0b01,
  /// Combine channels 0..=3 into the proximity channel.
  FirstFour = 0b10,
  /// Combine all 12 channels into the proximity channel.
  All = 0b11,
}

impl From<Proximity> for u8 {
  fn from(v: Proximity) -> Self {
    v as u8
  }
}

impl TryFrom<u8> for Proximity {
  type Error = ();

  fn try_from(bits: u8) -> Result<Self, Self::Error> {
    match bits & 0b11 {
      0b00 => Ok(Self::Disabled),
      0b01 => Ok(Self::FirstTwo),
      0b10 => Ok(Self::FirstFour),
      0b11 => Ok(Self::All),
      _ => Err(()),
    }
  }
}

/// Number of enabled touch channels, bits 3:0 of the run-control byte.
///
/// The controller always enables a prefix of the channel list: a count of
/// `n` activates channels `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchChannels(u8);

impl TouchChannels {
  /// No touch channels enabled.
  pub const DISABLED: Self = Self(0);
  /// All 12 touch channels enabled.
  pub const ALL: Self = Self(12);

  /// Enable the first `count` channels, clamped to 12.
  pub const fn first(count: u8) -> Self {
    if count > 12 {
      Self(12)
    } else {
      Self(count)
    }
  }

  pub const fn count(self) -> u8 {
    self.0
  }
}

impl From<TouchChannels> for u8 {
  fn from(v: TouchChannels) -> Self {
    v.0
  }
}

/// The run-control (electrode configuration) byte.
///
/// Writing a non-zero value starts capture; the layout is
/// `lock << 6 | proximity << 4 | touch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunControl {
  pub lock: CalibrationLock,
  pub proximity: Proximity,
  pub touch: TouchChannels,
}

impl RunControl {
  pub const fn new(lock: CalibrationLock, proximity: Proximity, touch: TouchChannels) -> Self {
    Self { lock, proximity, touch }
  }
}

impl From<RunControl> for u8 {
  fn from(rc: RunControl) -> Self {
    (rc.lock as u8) << 6 | (rc.proximity as u8) << 4 | rc.touch.0
  }
}

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{defs::Reg, CalibrationLock, Error, Halted, Proximity, RunControl, TouchChannels};

impl<'a, I, E, D> Halted<'a, I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Push the full configuration profile to the device.
  ///
  /// The write order matters: filters, debounce and clock, the autoconfig
  /// block, and finally the per-channel thresholds. The device must stay
  /// halted for the whole sequence.
  pub async fn apply(&mut self, config: &Config) -> Result<(), Error<E>> {
    self.write_filter(Reg::MaxHalfDeltaRising, &config.rising).await?;
    self.write_filter(Reg::MaxHalfDeltaFalling, &config.falling).await?;
    self.write_touched_filter(Reg::NoiseHalfDeltaTouched, &config.touched).await?;

    self.write_filter(Reg::ProxMaxHalfDeltaRising, &config.proximity_rising).await?;
    self.write_filter(Reg::ProxMaxHalfDeltaFalling, &config.proximity_falling).await?;
    self
      .write_touched_filter(Reg::ProxNoiseHalfDeltaTouched, &config.proximity_touched)
      .await?;

    self.configure(Reg::Debounce.into(), config.debounce.byte()).await?;
    self.configure(Reg::AfeConfig1.into(), config.front_end.config1).await?;
    self.configure(Reg::AfeConfig2.into(), config.front_end.config2).await?;

    self.configure(Reg::AutoConfigControl0.into(), config.auto_config.control0).await?;
    self.configure(Reg::AutoConfigControl1.into(), config.auto_config.control1).await?;
    self.configure(Reg::AutoConfigUpperLimit.into(), config.auto_config.upper_limit).await?;
    self.configure(Reg::AutoConfigLowerLimit.into(), config.auto_config.lower_limit).await?;
    self
      .configure(Reg::AutoConfigTargetLevel.into(), config.auto_config.target_level)
      .await?;

    self.configure_thresholds(config.thresholds.touch, config.thresholds.release).await
  }

  // The rising/falling banks are four consecutive registers starting at the
  // max-half-delta register; the touched banks have no max-half-delta and
  // span three.
  async fn write_filter(&mut self, base: Reg, filter: &BaselineFilter) -> Result<(), Error<E>> {
    let base = base as u8;
    self.configure(base, filter.max_half_delta).await?;
    self.configure(base + 1, filter.noise_half_delta).await?;
    self.configure(base + 2, filter.noise_count_limit).await?;
    self.configure(base + 3, filter.filter_delay_limit).await
  }

  async fn write_touched_filter(&mut self, base: Reg, filter: &TouchedFilter) -> Result<(), Error<E>> {
    let base = base as u8;
    self.configure(base, filter.noise_half_delta).await?;
    self.configure(base + 1, filter.noise_count_limit).await?;
    self.configure(base + 2, filter.filter_delay_limit).await
  }
}

/// Complete controller configuration, fixed at driver construction.
///
/// The defaults reproduce the demo board's profile: gentle rising/falling
/// baseline filtering, a slow touched filter, proximity sensing disabled,
/// autoconfiguration off, and 60/20 touch/release thresholds. Applying the
/// profile is a side-effecting register sequence ([`crate::Halted::apply`]);
/// only the thresholds have a dedicated runtime setter
/// ([`crate::Halted::configure_thresholds`]).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub rising: BaselineFilter,
  pub falling: BaselineFilter,
  pub touched: TouchedFilter,
  pub proximity_rising: BaselineFilter,
  pub proximity_falling: BaselineFilter,
  pub proximity_touched: TouchedFilter,
  pub debounce: Debounce,
  pub front_end: FrontEnd,
  pub auto_config: AutoConfig,
  pub thresholds: Thresholds,
  pub run: RunControl,
}

impl Config {
  pub const fn new() -> Self {
    Self {
      rising: BaselineFilter::new(0x01, 0x01, 0x10, 0x20),
      falling: BaselineFilter::new(0x01, 0x01, 0x10, 0x20),
      touched: TouchedFilter::new(0x01, 0x10, 0xFF),
      proximity_rising: BaselineFilter::new(0x0F, 0x0F, 0x00, 0x00),
      proximity_falling: BaselineFilter::new(0x01, 0x01, 0xFF, 0xFF),
      proximity_touched: TouchedFilter::new(0x00, 0x00, 0x00),
      debounce: Debounce::new(1, 1),
      front_end: FrontEnd::new(0xFF, 0x30),
      auto_config: AutoConfig::disabled(),
      thresholds: Thresholds::new(60, 20),
      run: RunControl::new(CalibrationLock::TrackingSeedFull, Proximity::Disabled, TouchChannels::ALL),
    }
  }

  pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
    self.thresholds = thresholds;
    self
  }

  pub const fn with_debounce(mut self, debounce: Debounce) -> Self {
    self.debounce = debounce;
    self
  }

  pub const fn with_auto_config(mut self, auto_config: AutoConfig) -> Self {
    self.auto_config = auto_config;
    self
  }

  pub const fn with_run(mut self, run: RunControl) -> Self {
    self.run = run;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}

/// One baseline filter bank (rising or falling slope).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaselineFilter {
  /// Largest magnitude of variation passed through the baseline filter.
  pub max_half_delta: u8,
  /// Incremental change allowed when non-noise drift is detected.
  pub noise_half_delta: u8,
  /// Number of samples consecutively greater than the max half delta.
  pub noise_count_limit: u8,
  /// Operation rate of the filter; larger values mean slower adjustment.
  pub filter_delay_limit: u8,
}

impl BaselineFilter {
  pub const fn new(max_half_delta: u8, noise_half_delta: u8, noise_count_limit: u8, filter_delay_limit: u8) -> Self {
    Self { max_half_delta, noise_half_delta, noise_count_limit, filter_delay_limit }
  }
}

/// Baseline filter bank used while a channel is touched; has no
/// max-half-delta stage.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchedFilter {
  pub noise_half_delta: u8,
  pub noise_count_limit: u8,
  pub filter_delay_limit: u8,
}

impl TouchedFilter {
  pub const fn new(noise_half_delta: u8, noise_count_limit: u8, filter_delay_limit: u8) -> Self {
    Self { noise_half_delta, noise_count_limit, filter_delay_limit }
  }
}

/// Consecutive-sample counts required before a touch or release is reported.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debounce {
  /// Samples above threshold before a touch registers, 0..=7.
  pub touch: u8,
  /// Samples below threshold before a release registers, 0..=7.
  pub release: u8,
}

impl Debounce {
  pub const fn new(touch: u8, release: u8) -> Self {
    Self { touch, release }
  }

  // Touch count in bits 2:0, release count in bits 6:4.
  pub(crate) const fn byte(self) -> u8 {
    (self.release & 0b111) << 4 | (self.touch & 0b111)
  }
}

/// Raw analog front-end and sampling clock configuration bytes.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrontEnd {
  /// First filter iterations and charge-discharge current.
  pub config1: u8,
  /// Charge-discharge time, second filter iterations, sample interval.
  pub config2: u8,
}

impl FrontEnd {
  pub const fn new(config1: u8, config2: u8) -> Self {
    Self { config1, config2 }
  }
}

/// Autoconfiguration/calibration tuning block.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoConfig {
  pub control0: u8,
  pub control1: u8,
  pub upper_limit: u8,
  pub lower_limit: u8,
  pub target_level: u8,
}

impl AutoConfig {
  /// Autoconfiguration fully disabled, as used by the board profile.
  pub const fn disabled() -> Self {
    Self { control0: 0, control1: 0, upper_limit: 0, lower_limit: 0, target_level: 0 }
  }
}

/// Touch/release sensitivity pair applied to every channel.
///
/// The release level must sit below the touch level to give the comparator
/// hysteresis; these are fixed configuration, not an online tuning surface.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
  pub touch: u8,
  pub release: u8,
}

impl Thresholds {
  pub const fn new(touch: u8, release: u8) -> Self {
    Self { touch, release }
  }
}

/******************************************************************************
 * Refer to the NXP MPR121 datasheet for more information, available here:    *
 * - https://www.nxp.com/docs/en/data-sheet/MPR121.pdf                        *
 * ========================================================================== *
 *                        MPR121 - Registers & Memory Map                     *
 ******************************************************************************/

/// Factory-default I²C address with the ADDR pin tied to VSS.
pub const DEFAULT_ADDRESS: u8 = 0x5A;

/// Settle time after a soft reset before the device accepts traffic.
pub(crate) const RESET_SETTLE_MS: u32 = 30;

/// Interval between touch status reads.
pub(crate) const TOUCH_POLL_MS: u32 = 50;

/// Interval between presence sensor reads (both modes).
pub(crate) const PRESENCE_POLL_MS: u32 = 50;

/// Minimum distance drop below the baseline that counts as an approach.
pub(crate) const PRESENCE_DELTA: u16 = 5;

/// Minimum time a ranged detection is held before it may release.
pub(crate) const PRESENCE_HOLD_MS: u64 = 1000;

/// Magic value written to [`Reg::SoftReset`] to trigger a device reset.
pub(crate) const SOFT_RESET_MAGIC: u8 = 0x63;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  // Touch status word, low byte first (0x00..0x01)
  TouchStatus = 0x00,

  // Baseline filter, rising slope (0x2B..0x2E)
  MaxHalfDeltaRising = 0x2B,
  NoiseHalfDeltaRising = 0x2C,
  NoiseCountLimitRising = 0x2D,
  FilterDelayLimitRising = 0x2E,

  // Baseline filter, falling slope (0x2F..0x32)
  MaxHalfDeltaFalling = 0x2F,
  NoiseHalfDeltaFalling = 0x30,
  NoiseCountLimitFalling = 0x31,
  FilterDelayLimitFalling = 0x32,

  // Baseline filter while touched (0x33..0x35)
  NoiseHalfDeltaTouched = 0x33,
  NoiseCountLimitTouched = 0x34,
  FilterDelayLimitTouched = 0x35,

  // Proximity channel baseline filters (0x36..0x40)
  ProxMaxHalfDeltaRising = 0x36,
  ProxNoiseHalfDeltaRising = 0x37,
  ProxNoiseCountLimitRising = 0x38,
  ProxFilterDelayLimitRising = 0x39,
  ProxMaxHalfDeltaFalling = 0x3A,
  ProxNoiseHalfDeltaFalling = 0x3B,
  ProxNoiseCountLimitFalling = 0x3C,
  ProxFilterDelayLimitFalling = 0x3D,
  ProxNoiseHalfDeltaTouched = 0x3E,
  ProxNoiseCountLimitTouched = 0x3F,
  ProxFilterDelayLimitTouched = 0x40,

  // Per-channel threshold pairs; channel k lives at base + 2k (0x41..0x5A)
  TouchThreshold0 = 0x41,
  ReleaseThreshold0 = 0x42,

  // Debounce counts and analog front end (0x5B..0x5D)
  Debounce = 0x5B,
  AfeConfig1 = 0x5C,
  AfeConfig2 = 0x5D,

  // Electrode/run control: stop, start, channel count, calibration lock (0x5E)
  RunControl = 0x5E,

  // Autoconfiguration block (0x7B..0x7F)
  AutoConfigControl0 = 0x7B,
  AutoConfigControl1 = 0x7C,
  AutoConfigUpperLimit = 0x7D,
  AutoConfigLowerLimit = 0x7E,
  AutoConfigTargetLevel = 0x7F,

  // Soft reset command register (0x80)
  SoftReset = 0x80,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

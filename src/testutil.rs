//! Shared helpers for the host-side unit tests.

use embedded_hal_mock::eh1::i2c::Transaction;

use crate::{Config, DEFAULT_ADDRESS};

/// Delay provider that completes immediately, for driving the async paths
/// under `block_on` without real sleeps.
pub(crate) struct NoDelay;

impl embedded_hal_async::delay::DelayNs for NoDelay {
  async fn delay_ns(&mut self, _ns: u32) {}
}

pub(crate) fn write(register: u8, value: u8) -> Transaction {
  Transaction::write(DEFAULT_ADDRESS, vec![register, value])
}

pub(crate) fn read_status(raw: u16) -> Transaction {
  Transaction::write_read(DEFAULT_ADDRESS, vec![0x00], raw.to_le_bytes().to_vec())
}

/// Every register write [`crate::Halted::apply`] performs for the given
/// config, in order.
pub(crate) fn profile_writes(config: &Config) -> Vec<Transaction> {
  let mut t = Vec::new();

  for (base, f) in [(0x2Bu8, &config.rising), (0x2F, &config.falling)] {
    t.push(write(base, f.max_half_delta));
    t.push(write(base + 1, f.noise_half_delta));
    t.push(write(base + 2, f.noise_count_limit));
    t.push(write(base + 3, f.filter_delay_limit));
  }
  t.push(write(0x33, config.touched.noise_half_delta));
  t.push(write(0x34, config.touched.noise_count_limit));
  t.push(write(0x35, config.touched.filter_delay_limit));

  for (base, f) in [(0x36u8, &config.proximity_rising), (0x3A, &config.proximity_falling)] {
    t.push(write(base, f.max_half_delta));
    t.push(write(base + 1, f.noise_half_delta));
    t.push(write(base + 2, f.noise_count_limit));
    t.push(write(base + 3, f.filter_delay_limit));
  }
  t.push(write(0x3E, config.proximity_touched.noise_half_delta));
  t.push(write(0x3F, config.proximity_touched.noise_count_limit));
  t.push(write(0x40, config.proximity_touched.filter_delay_limit));

  t.push(write(0x5B, config.debounce.byte()));
  t.push(write(0x5C, config.front_end.config1));
  t.push(write(0x5D, config.front_end.config2));

  t.push(write(0x7B, config.auto_config.control0));
  t.push(write(0x7C, config.auto_config.control1));
  t.push(write(0x7D, config.auto_config.upper_limit));
  t.push(write(0x7E, config.auto_config.lower_limit));
  t.push(write(0x7F, config.auto_config.target_level));

  for k in 0..12u8 {
    t.push(write(0x41 + 2 * k, config.thresholds.touch));
    t.push(write(0x42 + 2 * k, config.thresholds.release));
  }
  t
}

/// Full bring-up sequence for `initialize`: reset, stop, profile, start.
pub(crate) fn initialize_writes(config: &Config) -> Vec<Transaction> {
  let mut t = vec![write(0x80, 0x63), write(0x5E, 0x00)];
  t.extend(profile_writes(config));
  t.push(write(0x5E, u8::from(config.run)));
  t
}

/// One of the 12 independently monitored capacitive touch inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
  /// Number of touch channels on the controller.
  pub const COUNT: u8 = 12;

  /// Create a channel from its index; `None` for indices 12 and above.
  pub const fn new(index: u8) -> Option<Self> {
    if index < Self::COUNT {
      Some(Self(index))
    } else {
      None
    }
  }

  pub const fn index(self) -> u8 {
    self.0
  }

  /// The channel's bit within the touch status word.
  pub const fn mask(self) -> u16 {
    1 << self.0
  }

  /// All channels in ascending index order.
  pub fn all() -> impl Iterator<Item = Channel> {
    (0..Self::COUNT).map(Channel)
  }
}

/// Snapshot of the controller's touch status word.
///
/// Bit *k* set means channel *k* is currently touched. Only the low 12 bits
/// are meaningful; bits 12..=15 are reserved and ignored by the event layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchStatus(u16);

impl TouchStatus {
  pub const fn from_raw(raw: u16) -> Self {
    Self(raw)
  }

  /// The status word as read from the device, reserved bits included.
  pub const fn raw(self) -> u16 {
    self.0
  }

  /// The 12-bit channel mask with reserved bits cleared.
  pub const fn channels(self) -> u16 {
    self.0 & 0x0FFF
  }

  pub const fn is_touched(self, channel: Channel) -> bool {
    self.0 & channel.mask() != 0
  }

  /// Whether any channel is touched.
  pub fn any(self) -> bool {
    self.channels() != 0
  }

  /// Per-channel touch states in ascending channel order.
  pub fn iter(self) -> impl Iterator<Item = bool> {
    Channel::all().map(move |ch| self.is_touched(ch))
  }
}

/// Edge-triggered notification raised by the polling tasks.
///
/// Events are transient: dispatched once, in poll order, and discarded. The
/// triggering channel rides along in the event itself, so handlers never
/// consult shared state to learn what fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
  /// A channel transitioned from untouched to touched.
  Touched(Channel),
  /// A channel transitioned from touched to untouched.
  Released(Channel),
  /// The presence detector observed an approach.
  PresenceDetected,
}

/// Diff two consecutive status snapshots into edge events.
///
/// Yields [`Event::Touched`] for every 0→1 bit transition and
/// [`Event::Released`] for every 1→0 transition, in ascending channel order.
/// Unchanged bits and the reserved upper bits produce nothing, so a sustained
/// touch raises exactly one `Touched` and, later, exactly one `Released`
/// regardless of how many polls it spans.
pub fn edges(previous: TouchStatus, current: TouchStatus) -> Edges {
  Edges { previous: previous.channels(), current: current.channels(), index: 0 }
}

/// Iterator over the edge events between two status snapshots.
pub struct Edges {
  previous: u16,
  current: u16,
  index: u8,
}

impl Iterator for Edges {
  type Item = Event;

  fn next(&mut self) -> Option<Event> {
    while self.index < Channel::COUNT {
      let channel = Channel(self.index);
      self.index += 1;

      let was = self.previous & channel.mask() != 0;
      let is = self.current & channel.mask() != 0;
      match (was, is) {
        (false, true) => return Some(Event::Touched(channel)),
        (true, false) => return Some(Event::Released(channel)),
        _ => continue,
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ch(index: u8) -> Channel {
    Channel::new(index).unwrap()
  }

  fn collect(previous: u16, current: u16) -> Vec<Event> {
    edges(TouchStatus::from_raw(previous), TouchStatus::from_raw(current)).collect()
  }

  #[test]
  fn channel_rejects_out_of_range_indices() {
    assert!(Channel::new(11).is_some());
    assert!(Channel::new(12).is_none());
    assert_eq!(ch(5).mask(), 0b10_0000);
  }

  #[test]
  fn unchanged_bits_emit_nothing() {
    assert!(collect(0, 0).is_empty());
    assert!(collect(0b1010, 0b1010).is_empty());
  }

  #[test]
  fn transitions_classify_per_channel() {
    assert_eq!(collect(0, 0b1), vec![Event::Touched(ch(0))]);
    assert_eq!(collect(0b1, 0), vec![Event::Released(ch(0))]);
    assert_eq!(
      collect(0b0011, 0b0110),
      vec![Event::Released(ch(0)), Event::Touched(ch(2))]
    );
  }

  #[test]
  fn delivery_order_is_ascending_channel_index() {
    let events = collect(0, 0b1000_0000_0101);
    assert_eq!(
      events,
      vec![Event::Touched(ch(0)), Event::Touched(ch(2)), Event::Touched(ch(11))]
    );
  }

  #[test]
  fn sustained_touch_yields_one_edge_per_transition() {
    let mask = ch(7).mask();
    let mut events = Vec::new();

    // Held for many polls, then released.
    let reads = [0, mask, mask, mask, mask, 0];
    for pair in reads.windows(2) {
      events.extend(collect(pair[0], pair[1]));
    }

    assert_eq!(events, vec![Event::Touched(ch(7)), Event::Released(ch(7))]);
  }

  #[test]
  fn events_match_bit_transition_counts() {
    // Arbitrary mask sequence; count 0→1 and 1→0 transitions per channel.
    let reads: [u16; 6] = [0b0000, 0b0101, 0b0111, 0b0010, 0b1010, 0b0000];

    for channel in Channel::all() {
      let mut touched = 0;
      let mut released = 0;
      for pair in reads.windows(2) {
        for event in collect(pair[0], pair[1]) {
          if event == Event::Touched(channel) {
            touched += 1;
          }
          if event == Event::Released(channel) {
            released += 1;
          }
        }
      }

      let mut rising = 0;
      let mut falling = 0;
      for pair in reads.windows(2) {
        let was = pair[0] & channel.mask() != 0;
        let is = pair[1] & channel.mask() != 0;
        rising += usize::from(!was && is);
        falling += usize::from(was && !is);
      }
      assert_eq!(touched, rising, "channel {}", channel.index());
      assert_eq!(released, falling, "channel {}", channel.index());
    }
  }

  #[test]
  fn reserved_upper_bits_are_ignored() {
    assert!(collect(0x0000, 0xF000).is_empty());
    assert_eq!(collect(0x8000, 0x1001), vec![Event::Touched(ch(0))]);
    assert_eq!(TouchStatus::from_raw(0xF005).channels(), 0x0005);
  }

  #[test]
  fn status_iterates_all_channels() {
    let status = TouchStatus::from_raw(0b1010_1010_1010);
    let states: Vec<bool> = status.iter().collect();
    assert_eq!(states.len(), 12);
    for (i, touched) in states.iter().enumerate() {
      assert_eq!(*touched, i % 2 == 1);
    }
    assert!(status.any());
    assert!(!TouchStatus::default().any());
  }
}

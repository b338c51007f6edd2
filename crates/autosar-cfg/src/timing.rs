// crates/autosar-cfg/src/timing.rs

//! CAN bit-timing lookup.
//!
//! Segment values are expressed in time quanta and assume an 80 MHz CAN
//! peripheral clock. The table only knows the four standard CAN rates; any
//! other rate resolves to the 500 kbps row (see [`resolve_timing`]).

use log::warn;

/// Bit-timing segments for one baudrate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingParameters {
    /// `PROP-SEG`
    pub prop_seg: u8,
    /// `PHASE-SEG1`
    pub phase_seg1: u8,
    /// `PHASE-SEG2`
    pub phase_seg2: u8,
    /// `SYNC-JUMP-WIDTH`
    pub sync_jump_width: u8,
}

const TIMING_UP_TO_500K: TimingParameters = TimingParameters {
    prop_seg: 6,
    phase_seg1: 7,
    phase_seg2: 2,
    sync_jump_width: 1,
};

const TIMING_1M: TimingParameters = TimingParameters {
    prop_seg: 5,
    phase_seg1: 6,
    phase_seg2: 2,
    sync_jump_width: 1,
};

/// The standard CAN baudrates present in the timing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Baudrate {
    Kbps125,
    Kbps250,
    Kbps500,
    Kbps1000,
}

impl Baudrate {
    pub const ALL: [Baudrate; 4] = [
        Baudrate::Kbps125,
        Baudrate::Kbps250,
        Baudrate::Kbps500,
        Baudrate::Kbps1000,
    ];

    /// Row used when a rate is not in the table.
    pub const FALLBACK: Baudrate = Baudrate::Kbps500;

    pub fn from_kbps(kbps: u32) -> Option<Self> {
        match kbps {
            125 => Some(Baudrate::Kbps125),
            250 => Some(Baudrate::Kbps250),
            500 => Some(Baudrate::Kbps500),
            1000 => Some(Baudrate::Kbps1000),
            _ => None,
        }
    }

    pub fn kbps(self) -> u32 {
        match self {
            Baudrate::Kbps125 => 125,
            Baudrate::Kbps250 => 250,
            Baudrate::Kbps500 => 500,
            Baudrate::Kbps1000 => 1000,
        }
    }

    pub fn timing(self) -> TimingParameters {
        match self {
            Baudrate::Kbps125 | Baudrate::Kbps250 | Baudrate::Kbps500 => TIMING_UP_TO_500K,
            Baudrate::Kbps1000 => TIMING_1M,
        }
    }
}

/// Maps a baudrate in kbps to its bit-timing segments.
///
/// Rates outside the table resolve to the [`Baudrate::FALLBACK`] row instead
/// of failing. The fallback is logged at `warn` so a mistyped rate is visible.
pub fn resolve_timing(baudrate_kbps: u32) -> TimingParameters {
    match Baudrate::from_kbps(baudrate_kbps) {
        Some(rate) => rate.timing(),
        None => {
            warn!(
                "No bit timing defined for {} kbps, using the {} kbps row",
                baudrate_kbps,
                Baudrate::FALLBACK.kbps()
            );
            Baudrate::FALLBACK.timing()
        }
    }
}

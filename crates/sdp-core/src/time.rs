//! Day-of-week and time-slice model for historical traffic.
//!
//! A day is divided into equal slices: 96 × 15 min (HERE speed profiles) or
//! 288 × 5 min (MultiNet `hspr`).  Slice `i` starts at `i * minutes` after
//! midnight; slice 0 is the reference slot every factor is normalized to.

use std::fmt;

// ── Weekday ───────────────────────────────────────────────────────────────────

/// Day of week, Sunday first, as used by the pattern column names.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Single-letter column code: `U M T W R F S`.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Sunday    => "U",
            Weekday::Monday    => "M",
            Weekday::Tuesday   => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday  => "R",
            Weekday::Friday    => "F",
            Weekday::Saturday  => "S",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── SliceGranularity ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SliceGranularity {
    Minutes15,
    Minutes5,
}

impl SliceGranularity {
    #[inline]
    pub fn slice_minutes(self) -> u32 {
        match self {
            SliceGranularity::Minutes15 => 15,
            SliceGranularity::Minutes5 => 5,
        }
    }

    /// Number of slices in one day (96 or 288).
    #[inline]
    pub fn slice_count(self) -> usize {
        (24 * 60 / self.slice_minutes()) as usize
    }

    /// Slice index containing `seconds` after midnight, or `None` past the
    /// end of the day.
    pub fn slice_of_seconds(self, seconds: u32) -> Option<usize> {
        let idx = (seconds / (self.slice_minutes() * 60)) as usize;
        (idx < self.slice_count()).then_some(idx)
    }

    /// `HHMM` label of slice `i`, e.g. `0015`.
    pub fn label(self, i: usize) -> String {
        let minutes = i as u32 * self.slice_minutes();
        format!("{:02}{:02}", minutes / 60, minutes % 60)
    }

    /// HERE profile column name of slice `i`, e.g. `H00_15`.
    pub fn here_column(self, i: usize) -> String {
        let minutes = i as u32 * self.slice_minutes();
        format!("H{:02}_{:02}", minutes / 60, minutes % 60)
    }
}

//! Directory entry metadata: DOS attribute bits and packed FAT timestamps.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// DOS attribute bits as stored in a FAT directory entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(u8);

impl Attributes {
    pub const READ_ONLY: Self = Self(0x01);
    pub const HIDDEN: Self = Self(0x02);
    pub const SYSTEM: Self = Self(0x04);
    pub const DIRECTORY: Self = Self(0x10);
    pub const ARCHIVE: Self = Self(0x20);

    /// The bits `set_attributes` is allowed to touch.
    pub const CHANGEABLE: Self = Self(0x01 | 0x02 | 0x04 | 0x20);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping anything that is not a known flag.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & (0x01 | 0x02 | 0x04 | 0x10 | 0x20))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for Attributes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Attributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Attributes {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Attributes {
    type Output = Self;
    fn not(self) -> Self {
        Self::from_bits_truncate(!self.0)
    }
}

// ---------------------------------------------------------------------------
// Packed date / time
// ---------------------------------------------------------------------------

/// FAT packed date: bits 15-9 year since 1980, 8-5 month, 4-0 day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FatDate(pub u16);

impl FatDate {
    /// Pack a calendar date. Years outside 1980..=2107 are clamped.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let year = (year.clamp(1980, 2107) - 1980) as u16;
        Self((year << 9) | (((month & 0xf) as u16) << 5) | (day & 0x1f) as u16)
    }

    pub fn year(self) -> u16 {
        1980 + ((self.0 >> 9) & 0x7f)
    }

    pub fn month(self) -> u16 {
        (self.0 >> 5) & 0xf
    }

    pub fn day(self) -> u16 {
        self.0 & 0x1f
    }
}

impl fmt::Display for FatDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.month(), self.day(), self.year())
    }
}

/// FAT packed time: bits 15-11 hours, 10-5 minutes, 4-0 seconds / 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FatTime(pub u16);

impl FatTime {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        Self(
            (((hour & 0x1f) as u16) << 11)
                | (((minute & 0x3f) as u16) << 5)
                | ((second / 2) & 0x1f) as u16,
        )
    }

    pub fn hour(self) -> u16 {
        (self.0 >> 11) & 0x1f
    }

    pub fn minute(self) -> u16 {
        (self.0 >> 5) & 0x3f
    }

    pub fn second(self) -> u16 {
        (self.0 & 0x1f) * 2
    }
}

/// Twelve-hour clock, e.g. `03:07 PM`.
impl fmt::Display for FatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.hour();
        let ampm = if hour >= 12 { "PM" } else { "AM" };
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{hour:02}:{:02} {ampm}", self.minute())
    }
}

/// Current local time packed as a FAT timestamp.
pub fn local_timestamp() -> (FatDate, FatTime) {
    use chrono::{Datelike, Local, Timelike};

    let now = Local::now();
    (
        FatDate::from_ymd(now.year(), now.month(), now.day()),
        FatTime::from_hms(now.hour(), now.minute(), now.second()),
    )
}

// ---------------------------------------------------------------------------
// DirEntry
// ---------------------------------------------------------------------------

/// One entry produced by a directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Long (display) name.
    pub name: String,
    /// 8.3 alias, present when the long name does not fit 8.3 itself.
    pub short_name: Option<String>,
    pub attributes: Attributes,
    /// Size in bytes (0 for directories).
    pub size: u64,
    pub date: FatDate,
    pub time: FatTime,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.attributes.contains(Attributes::DIRECTORY)
    }

    /// Hidden or system entries are left out of listings unless asked for.
    pub fn is_hidden(&self) -> bool {
        self.attributes
            .intersects(Attributes::HIDDEN | Attributes::SYSTEM)
    }

    /// The short name when it differs from the long name other than by case.
    pub fn distinct_short_name(&self) -> Option<&str> {
        self.short_name
            .as_deref()
            .filter(|short| !short.eq_ignore_ascii_case(&self.name))
    }
}

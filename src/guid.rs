//! A portable GUID
//!
//! Provider identities and `win:GUID` payload fields are both represented by [`Guid`].
//! Its layout matches the Windows `GUID` structure, so that on Windows it converts
//! to and from `windows::core::GUID` for free.
use std::fmt::{self, Debug, Display, Write};
use std::str::FromStr;

use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{FromBytes, FromZeroes, Unaligned};

/// The serialized layout of a GUID: `data1`..`data3` little-endian, `data4` as raw bytes
#[derive(FromZeroes, FromBytes, Unaligned)]
#[repr(C)]
struct GuidLayout {
    data1: U32<LittleEndian>,
    data2: U16<LittleEndian>,
    data3: U16<LittleEndian>,
    data4: [u8; 8],
}

/// Size in bytes of a serialized GUID
pub const GUID_SIZE: usize = 16;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// Error returned when a string is not a valid GUID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidParseError(String);

impl Display for GuidParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid guid `{}`", self.0)
    }
}

impl std::error::Error for GuidParseError {}

impl Guid {
    pub const fn zeroed() -> Self {
        Self::from_values(0, 0, 0, [0; 8])
    }

    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Builds a GUID from its big-endian 128-bit representation, e.g. `0xe13c0d23_ccbc_4e12_931b_d9cc2eee27e4`
    pub const fn from_u128(uuid: u128) -> Self {
        Self {
            data1: (uuid >> 96) as u32,
            data2: (uuid >> 80 & 0xffff) as u16,
            data3: (uuid >> 64 & 0xffff) as u16,
            data4: (uuid as u64).to_be_bytes(),
        }
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | (u64::from_be_bytes(self.data4) as u128)
    }

    /// Decodes a GUID serialized in an event payload
    ///
    /// Returns `None` if `bytes` is shorter than [`GUID_SIZE`]. Extra bytes are ignored.
    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let layout = GuidLayout::read_from_prefix(bytes)?;
        Some(Self {
            data1: layout.data1.get(),
            data2: layout.data2.get(),
            data3: layout.data3.get(),
            data4: layout.data4,
        })
    }

    pub fn to_le_bytes(&self) -> [u8; GUID_SIZE] {
        let mut bytes = [0u8; GUID_SIZE];
        bytes[0..4].copy_from_slice(&self.data1.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.data2.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.data3.to_le_bytes());
        bytes[8..].copy_from_slice(&self.data4);
        bytes
    }
}

impl FromStr for Guid {
    type Err = GuidParseError;

    /// Accepts `E13C0D23-CCBC-4E12-931B-D9CC2EEE27E4`, optionally surrounded by braces, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GuidParseError(s.to_owned());

        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .unwrap_or(trimmed);

        let groups: Vec<&str> = trimmed.split('-').collect();
        let expected_lengths = [8, 4, 4, 4, 12];
        if groups.len() != expected_lengths.len()
            || groups
                .iter()
                .zip(expected_lengths.iter())
                .any(|(group, len)| {
                    group.len() != *len || !group.bytes().all(|b| b.is_ascii_hexdigit())
                })
        {
            return Err(err());
        }

        let hex: String = groups.concat();
        let value = u128::from_str_radix(&hex, 16).map_err(|_| err())?;
        Ok(Self::from_u128(value))
    }
}

impl Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Using `format!` would extend the string multiple times,
        // but we know ahead of time how much space we need.
        let mut s = String::with_capacity(36);
        write!(
            &mut s,
            "{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7]
        )?;
        f.write_str(&s)
    }
}

impl Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(windows)]
impl From<windows::core::GUID> for Guid {
    fn from(guid: windows::core::GUID) -> Self {
        Self::from_values(guid.data1, guid.data2, guid.data3, guid.data4)
    }
}

#[cfg(windows)]
impl From<Guid> for windows::core::GUID {
    fn from(guid: Guid) -> Self {
        windows::core::GUID::from_values(guid.data1, guid.data2, guid.data3, guid.data4)
    }
}

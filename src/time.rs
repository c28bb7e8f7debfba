//! Interpretation of event timestamps
//!
//! Unless the capture session asked for raw (QPC or CPU cycle) timestamps, the timestamp of an event is a
//! [FILETIME](https://learn.microsoft.com/en-us/windows/win32/api/minwinbase/ns-minwinbase-filetime):
//! the number of 100ns intervals since January 1, 1601 (UTC).

/// A FILETIME, as the 64-bit count of 100ns ticks since 1601-01-01
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FileTime(i64);

const SECONDS_BETWEEN_1601_AND_1970: i64 = 11_644_473_600;
const NS_IN_SECOND: i64 = 1_000_000_000;
const MS_IN_SECOND: i64 = 1_000;

impl FileTime {
    pub const fn from_quad(quad: i64) -> Self {
        FileTime(quad)
    }

    /// Builds a FileTime from its two 32-bit halves, as found in a native `FILETIME`
    pub const fn from_parts(high: u32, low: u32) -> Self {
        FileTime(((high as i64) << 32) | low as i64)
    }

    pub const fn as_quad(&self) -> i64 {
        self.0
    }

    /// Converts to a unix timestamp with millisecond granularity.
    pub fn as_unix_timestamp(&self) -> i64 {
        self.0 / 10_000 - (SECONDS_BETWEEN_1601_AND_1970 * MS_IN_SECOND)
    }

    /// Converts to a unix timestamp with nanosecond granularity.
    pub fn as_unix_timestamp_nanos(&self) -> i128 {
        self.0 as i128 * 100 - (SECONDS_BETWEEN_1601_AND_1970 as i128 * NS_IN_SECOND as i128)
    }

    /// Converts to OffsetDateTime
    #[cfg(feature = "time_rs")]
    pub fn as_date_time(&self) -> Result<time::OffsetDateTime, time::error::ComponentRange> {
        time::OffsetDateTime::from_unix_timestamp_nanos(self.as_unix_timestamp_nanos())
    }
}

impl From<i64> for FileTime {
    fn from(quad: i64) -> Self {
        FileTime(quad)
    }
}

#[cfg(feature = "time_rs")]
impl TryFrom<FileTime> for time::OffsetDateTime {
    type Error = time::error::ComponentRange;

    fn try_from(file_time: FileTime) -> Result<Self, Self::Error> {
        file_time.as_date_time()
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Serialize for FileTime {
    #[cfg(feature = "time_rs")]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.as_date_time() {
            Ok(date_time) => date_time.serialize(serializer),
            Err(_) => self.as_unix_timestamp().serialize(serializer),
        }
    }

    #[cfg(not(feature = "time_rs"))]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_unix_timestamp().serialize(serializer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // 2022-01-01T00:00:00Z
    const NEW_YEAR_2022: i64 = 132_854_688_000_000_000;

    #[test]
    fn test_unix_timestamp() {
        let file_time = FileTime::from_quad(NEW_YEAR_2022);
        assert_eq!(file_time.as_unix_timestamp(), 1_640_995_200_000);
        assert_eq!(
            file_time.as_unix_timestamp_nanos(),
            1_640_995_200_000_000_000
        );

        let epoch = FileTime::from_quad(SECONDS_BETWEEN_1601_AND_1970 * 10_000_000);
        assert_eq!(epoch.as_unix_timestamp(), 0);
    }

    #[test]
    fn test_from_parts() {
        let file_time = FileTime::from_parts(
            (NEW_YEAR_2022 >> 32) as u32,
            (NEW_YEAR_2022 & 0xffff_ffff) as u32,
        );
        assert_eq!(file_time.as_quad(), NEW_YEAR_2022);
    }

    #[cfg(feature = "time_rs")]
    #[test]
    fn test_date_time() {
        let date_time = FileTime::from_quad(NEW_YEAR_2022).as_date_time().unwrap();
        assert_eq!(date_time.year(), 2022);
        assert_eq!(date_time.ordinal(), 1);
        assert_eq!(date_time.hour(), 0);
    }
}

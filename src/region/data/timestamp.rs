use bitfield::bitfield;
#[cfg(feature = "chrono")]
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use derive_more::Into;

bitfield! {
    /// Packed DOS date (high half) and time (low half), as stored at
    /// create and last-modified positions of a short entry
    #[derive(Copy, Clone, Debug, Default, Into, PartialEq, Eq)]
    pub struct Timestamp(u32);
    year_offset, set_year_offset: 31, 25;
    pub month, set_month: 24, 21;
    pub day, set_day: 20, 16;
    pub hour, set_hour: 15, 11;
    pub minute, set_minute: 10, 5;
    pub double_second, set_double_second: 4, 0;
}

impl Timestamp {
    pub fn year(&self) -> u32 {
        self.year_offset() + 1980
    }

    pub fn set_year(&mut self, year: u32) {
        self.set_year_offset(year.saturating_sub(1980))
    }

    pub fn second(&self) -> u32 {
        self.double_second() * 2
    }

    pub fn set_second(&mut self, second: u32) {
        self.set_double_second(second / 2)
    }

    /// DOS date half only, as used by the last-accessed field
    pub fn date(&self) -> u16 {
        (self.0 >> 16) as u16
    }
}

impl From<u32> for Timestamp {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(feature = "chrono")]
impl Timestamp {
    /// None when fields do not form a valid calendar date
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year() as i32, self.month(), self.day())?;
        let time = NaiveTime::from_hms_opt(self.hour(), self.minute(), self.second())?;
        Some(NaiveDateTime::new(date, time))
    }
}

#[cfg(feature = "chrono")]
impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        let mut timestamp = Self::default();
        timestamp.set_year(datetime.year() as u32);
        timestamp.set_month(datetime.month());
        timestamp.set_day(datetime.day());
        timestamp.set_hour(datetime.hour());
        timestamp.set_minute(datetime.minute());
        timestamp.set_second(datetime.second());
        timestamp
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DateTime {
    pub timestamp: Timestamp,
    /// Sub two-second part, 0..=1990
    pub millisecond: u16,
}

impl DateTime {
    /// Local wall clock when available, DOS epoch zero otherwise
    pub fn now() -> Self {
        match () {
            #[cfg(all(feature = "chrono", feature = "std"))]
            () => {
                let now = chrono::Local::now().naive_local();
                let millisecond =
                    (now.second() % 2) as u16 * 1000 + (now.nanosecond() / 1_000_000) as u16;
                Self { timestamp: now.into(), millisecond }
            }
            #[cfg(not(all(feature = "chrono", feature = "std")))]
            () => Self::default(),
        }
    }

    /// Create time fine resolution byte, in 10ms units
    pub(crate) fn centiseconds(&self) -> u8 {
        (self.millisecond / 10) as u8
    }
}

#[cfg(test)]
mod test {
    use super::Timestamp;

    #[test]
    fn test_timestamp() {
        // 2026-01-29 14:30:58
        let date = 29 | (1 << 5) | (46 << 9);
        let time = 29 | (30 << 5) | (14 << 11);
        let timestamp = Timestamp::from((date as u32) << 16 | time as u32);
        assert_eq!(timestamp.year(), 2026);
        assert_eq!(timestamp.month(), 1);
        assert_eq!(timestamp.day(), 29);
        assert_eq!(timestamp.hour(), 14);
        assert_eq!(timestamp.minute(), 30);
        assert_eq!(timestamp.second(), 58);
        assert_eq!(timestamp.date(), date);

        let mut copy = Timestamp::default();
        copy.set_year(2026);
        copy.set_month(1);
        copy.set_day(29);
        copy.set_hour(14);
        copy.set_minute(30);
        copy.set_second(58);
        assert_eq!(copy, timestamp);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_chrono() {
        use chrono::NaiveDate;

        let datetime = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(23, 59, 58).unwrap();
        let timestamp = Timestamp::from(datetime);
        assert_eq!(timestamp.to_naive(), Some(datetime));
        assert_eq!(super::Timestamp::default().to_naive(), None);
    }
}

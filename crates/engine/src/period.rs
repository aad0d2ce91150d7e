//! Calendar-month scope shared by filters, budgets and summaries.

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// A calendar month (year + month), the unit every scoped read and every
/// budget row is keyed on.
///
/// Construction always validates the month, so the date conversions below
/// cannot fail. Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "invalid month: {month}"
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPeriod(format!("invalid year: {year}")));
        }
        Ok(Self { year, month })
    }

    /// Month/year as sent by clients, each falling back to `today`'s
    /// calendar month/year when absent. Every scoped read path resolves its
    /// period through here so the defaulting policy lives in one place.
    pub fn resolve(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> ResultEngine<Self> {
        Self::new(
            year.unwrap_or_else(|| today.year()),
            month.unwrap_or_else(|| today.month()),
        )
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month immediately before this one; January rolls over
    /// to December of the prior year.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // Month is validated on construction; the fallback is unreachable.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month. Together with [`Period::first_day`]
    /// this bounds the half-open date range covering the month.
    pub fn next_first_day(self) -> NaiveDate {
        self.next().first_day()
    }

    /// Canonical `YYYY-MM` key budget rows are stored under.
    pub fn month_key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Two-digit month string echoed in summary responses.
    pub fn month_str(self) -> String {
        format!("{:02}", self.month)
    }

    /// Four-digit year string echoed in summary responses.
    pub fn year_str(self) -> String {
        format!("{}", self.year)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
        assert!(Period::new(2024, 12).is_ok());
    }

    #[test]
    fn resolve_defaults_to_today() {
        let today = date(2024, 3, 15);
        assert_eq!(
            Period::resolve(None, None, today).unwrap(),
            Period::new(2024, 3).unwrap()
        );
        assert_eq!(
            Period::resolve(Some(7), None, today).unwrap(),
            Period::new(2024, 7).unwrap()
        );
        assert_eq!(
            Period::resolve(None, Some(2021), today).unwrap(),
            Period::new(2021, 3).unwrap()
        );
    }

    #[test]
    fn prev_rolls_january_into_prior_year() {
        let january = Period::new(2024, 1).unwrap();
        assert_eq!(january.prev(), Period::new(2023, 12).unwrap());
        let july = Period::new(2024, 7).unwrap();
        assert_eq!(july.prev(), Period::new(2024, 6).unwrap());
    }

    #[test]
    fn month_key_is_zero_padded() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(period.month_key(), "2024-03");
        assert_eq!(period.month_str(), "03");
        assert_eq!(period.year_str(), "2024");
        assert_eq!((period.year(), period.month()), (2024, 3));
        assert_eq!(Period::new(2024, 11).unwrap().month_key(), "2024-11");
    }

    #[test]
    fn date_range_covers_the_month() {
        let december = Period::new(2023, 12).unwrap();
        assert_eq!(december.first_day(), date(2023, 12, 1));
        assert_eq!(december.next_first_day(), date(2024, 1, 1));
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(Period::new(2023, 12).unwrap() < Period::new(2024, 1).unwrap());
        assert!(Period::new(2024, 1).unwrap() < Period::new(2024, 2).unwrap());
    }
}

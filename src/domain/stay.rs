use crate::error::{AppError, AppResult};
use chrono::NaiveDate;

/// A validated `[check_in, check_out)` interval. Each date in it is one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::ValidationError(
                "Check-out must be after check-in".to_string(),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn night_dates(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }

    /// Half-open overlap: a departure day is free for the next arrival.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && check_in < self.check_out
    }

    pub fn contains_night(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

/// Every date of `[start, end]`, empty when `start > end`.
pub fn dates_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_rejects_empty_and_reversed_stays() {
        assert!(Stay::new(d("2026-07-01"), d("2026-07-01")).is_err());
        assert!(Stay::new(d("2026-07-02"), d("2026-07-01")).is_err());
    }

    #[test]
    fn test_nights_cross_month_boundary() {
        let stay = Stay::new(d("2026-05-31"), d("2026-06-02")).unwrap();
        assert_eq!(stay.nights(), 2);
        let nights: Vec<_> = stay.night_dates().collect();
        assert_eq!(nights, vec![d("2026-05-31"), d("2026-06-01")]);
        assert!(!stay.contains_night(d("2026-06-02")));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let existing = Stay::new(d("2026-07-01"), d("2026-07-05")).unwrap();
        assert!(existing.overlaps(d("2026-07-04"), d("2026-07-06")));
        assert!(!existing.overlaps(d("2026-07-05"), d("2026-07-06")));
        assert!(!existing.overlaps(d("2026-06-28"), d("2026-07-01")));
        assert!(existing.overlaps(d("2026-06-28"), d("2026-07-10")));
    }

    #[test]
    fn test_dates_inclusive() {
        assert_eq!(dates_inclusive(d("2026-08-10"), d("2026-08-12")).len(), 3);
        assert_eq!(dates_inclusive(d("2026-08-10"), d("2026-08-10")).len(), 1);
        assert!(dates_inclusive(d("2026-08-12"), d("2026-08-10")).is_empty());
    }
}

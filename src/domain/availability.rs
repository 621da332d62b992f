use crate::domain::Stay;
use crate::entities::booking_entity;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Nights in `[start, end]` that cannot be sold: every night covered by an
/// occupying booking plus every blocked date, clipped to the window.
/// A reversed window yields nothing.
pub fn unavailable_dates<B, D>(
    start: NaiveDate,
    end: NaiveDate,
    occupied: B,
    blocked: D,
) -> BTreeSet<NaiveDate>
where
    B: IntoIterator<Item = (NaiveDate, NaiveDate)>,
    D: IntoIterator<Item = NaiveDate>,
{
    let mut dates = BTreeSet::new();
    if start > end {
        return dates;
    }
    for (check_in, check_out) in occupied {
        let first = check_in.max(start);
        dates.extend(
            first
                .iter_days()
                .take_while(|night| *night < check_out && *night <= end),
        );
    }
    dates.extend(blocked.into_iter().filter(|d| *d >= start && *d <= end));
    dates
}

/// First booking in `existing` that holds the room for any night of `stay`.
pub fn find_conflict<'a>(
    stay: &Stay,
    existing: &'a [booking_entity::Model],
) -> Option<&'a booking_entity::Model> {
    existing
        .iter()
        .find(|b| b.status.occupies_room() && stay.overlaps(b.check_in, b.check_out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BookingStatus;
    use crate::services::fixtures::booking;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_booking_nights_exclude_checkout() {
        let dates = unavailable_dates(
            d("2026-07-01"),
            d("2026-07-31"),
            vec![(d("2026-07-01"), d("2026-07-05"))],
            vec![],
        );
        let expected: BTreeSet<_> = ["2026-07-01", "2026-07-02", "2026-07-03", "2026-07-04"]
            .iter()
            .map(|s| d(s))
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_window_clips_bookings_and_blocks() {
        let dates = unavailable_dates(
            d("2026-07-03"),
            d("2026-07-10"),
            vec![(d("2026-06-28"), d("2026-07-05")), (d("2026-07-09"), d("2026-07-15"))],
            vec![d("2026-07-02"), d("2026-07-07"), d("2026-07-11")],
        );
        let got: Vec<_> = dates.into_iter().collect();
        assert_eq!(
            got,
            vec![
                d("2026-07-03"),
                d("2026-07-04"),
                d("2026-07-07"),
                d("2026-07-09"),
                d("2026-07-10"),
            ]
        );
    }

    #[test]
    fn test_reversed_window_is_empty() {
        let dates = unavailable_dates(
            d("2026-07-10"),
            d("2026-07-01"),
            vec![(d("2026-07-01"), d("2026-07-20"))],
            vec![d("2026-07-05")],
        );
        assert!(dates.is_empty());
    }

    #[test]
    fn test_overlapping_sources_are_deduplicated() {
        let dates = unavailable_dates(
            d("2026-08-01"),
            d("2026-08-31"),
            vec![(d("2026-08-10"), d("2026-08-12"))],
            vec![d("2026-08-10"), d("2026-08-11")],
        );
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn test_find_conflict_frees_checkout_day() {
        let existing = vec![booking("pozzo", "2026-07-01", "2026-07-05")];

        let overlapping = Stay::new(d("2026-07-04"), d("2026-07-06")).unwrap();
        let hit = find_conflict(&overlapping, &existing).unwrap();
        assert_eq!(hit.id, existing[0].id);

        let back_to_back = Stay::new(d("2026-07-05"), d("2026-07-06")).unwrap();
        assert!(find_conflict(&back_to_back, &existing).is_none());

        let before = Stay::new(d("2026-06-28"), d("2026-07-01")).unwrap();
        assert!(find_conflict(&before, &existing).is_none());
    }

    #[test]
    fn test_released_bookings_do_not_conflict() {
        let mut cancelled = booking("pozzo", "2026-07-01", "2026-07-05");
        cancelled.status = BookingStatus::Cancelled;
        let mut completed = booking("pozzo", "2026-07-01", "2026-07-05");
        completed.status = BookingStatus::Completed;
        let stay = Stay::new(d("2026-07-02"), d("2026-07-04")).unwrap();

        assert!(find_conflict(&stay, &[cancelled, completed.clone()]).is_none());

        let mut confirmed = completed;
        confirmed.status = BookingStatus::Confirmed;
        assert!(find_conflict(&stay, &[confirmed]).is_some());
    }
}

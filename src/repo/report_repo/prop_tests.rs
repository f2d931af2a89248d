use super::*;
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..400).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::new(offset as u64)
    })
}

fn arb_stay() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (arb_date(), 1u64..30).prop_map(|(check_in, nights)| (check_in, check_in + Days::new(nights)))
}

proptest! {
    #[test]
    fn tally_covers_every_day_once(from in arb_date(), span in 0u64..60, stays in prop::collection::vec(arb_stay(), 0..10)) {
        let to = from + Days::new(span);
        let days = tally_occupancy(&stays, from, to, 10);

        prop_assert_eq!(days.len() as u64, span + 1);
        prop_assert_eq!(days.first().map(|d| d.date), Some(from));
        prop_assert_eq!(days.last().map(|d| d.date), Some(to));
    }

    #[test]
    fn booked_plus_available_is_total_when_capacity_suffices(from in arb_date(), span in 0u64..60, stays in prop::collection::vec(arb_stay(), 0..10)) {
        let to = from + Days::new(span);
        let total = stays.len() as i64; // Can never be exceeded
        let days = tally_occupancy(&stays, from, to, total);

        for day in days {
            prop_assert!(day.booked <= total);
            prop_assert_eq!(day.booked + day.available, total);
        }
    }

    #[test]
    fn booked_matches_stays_covering_the_day(from in arb_date(), stays in prop::collection::vec(arb_stay(), 0..10)) {
        let days = tally_occupancy(&stays, from, from, 100);

        let expected = stays.iter().filter(|(ci, co)| *ci <= from && from < *co).count() as i64;
        prop_assert_eq!(days[0].booked, expected);
    }

    #[test]
    fn available_is_never_negative(from in arb_date(), span in 0u64..30, stays in prop::collection::vec(arb_stay(), 0..20), total in 0i64..5) {
        let to = from + Days::new(span);
        for day in tally_occupancy(&stays, from, to, total) {
            prop_assert!(day.available >= 0);
        }
    }
}

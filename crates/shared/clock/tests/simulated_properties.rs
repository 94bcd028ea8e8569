//! Property tests for the simulated clock
//!
//! For any range and positive interval the clock yields
//! `ceil((stop - start) / interval)` ticks, evenly spaced from `start`,
//! all strictly before `stop`.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use trader_clock::{Clock, SimulatedClock};

proptest! {
    #[test]
    fn simulated_tick_count_and_spacing(
        offset_secs in 0i64..1_000_000,
        span_secs in 1i64..5_000,
        interval_secs in 1i64..600,
    ) {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset_secs);
        let stop = start + Duration::seconds(span_secs);
        let interval = Duration::seconds(interval_secs);

        let clock = SimulatedClock::new(start, stop, interval).unwrap();
        let ticks: Vec<_> = clock.ticks().map(|t| t.timestamp().unwrap()).collect();

        let expected = (span_secs + interval_secs - 1) / interval_secs;
        prop_assert_eq!(ticks.len() as i64, expected);
        prop_assert_eq!(ticks[0], start);
        for pair in ticks.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], interval);
        }
        prop_assert!(ticks.iter().all(|t| *t < stop));
    }

    #[test]
    fn simulated_empty_when_stop_not_after_start(
        back_secs in 0i64..10_000,
        interval_secs in 1i64..600,
    ) {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let stop = start - Duration::seconds(back_secs);

        let clock = SimulatedClock::new(start, stop, Duration::seconds(interval_secs)).unwrap();
        prop_assert_eq!(clock.ticks().count(), 0);
    }
}

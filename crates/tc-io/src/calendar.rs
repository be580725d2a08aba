//! Gregorian calendar stepping for [`StepTimestamp`] — the arithmetic the
//! core explicitly does not own (§1, §4.11).

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tc_core::StepTimestamp;

fn to_naive(ts: StepTimestamp) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(ts.year, ts.month, ts.day)?.and_hms_opt(ts.hour, ts.minute, 0)
}

fn from_naive(dt: NaiveDateTime) -> StepTimestamp {
    StepTimestamp {
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
    }
}

/// Advance `ts` by `step_minutes`. Panics if `ts` is not a valid calendar
/// date — callers are expected to build `ts` from `advance_from` or a
/// trusted source.
pub fn advance(ts: StepTimestamp, step_minutes: i64) -> StepTimestamp {
    let dt = to_naive(ts).expect("StepTimestamp must be a valid Gregorian date");
    let advanced = dt + chrono::Duration::minutes(step_minutes);
    from_naive(advanced)
}

/// Build a `StepTimestamp` `step_index` intervals after `origin`.
pub fn at_step(origin: StepTimestamp, step_minutes: i64, step_index: usize) -> StepTimestamp {
    advance(origin, step_minutes * step_index as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_across_a_day_boundary() {
        let ts = StepTimestamp {
            year: 2024,
            month: 9,
            day: 30,
            hour: 23,
            minute: 0,
        };
        let next = advance(ts, 360);
        assert_eq!(next.day, 1);
        assert_eq!(next.month, 10);
        assert_eq!(next.hour, 5);
    }

    #[test]
    fn at_step_zero_is_the_origin() {
        let ts = StepTimestamp {
            year: 2024,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        };
        assert_eq!(at_step(ts, 360, 0), ts);
    }

    #[test]
    fn at_step_advances_by_multiples() {
        let ts = StepTimestamp {
            year: 2024,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        };
        let stepped = at_step(ts, 360, 4);
        assert_eq!(stepped.day, 2);
        assert_eq!(stepped.hour, 0);
    }
}

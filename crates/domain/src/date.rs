use chrono::prelude::*;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => panic!("Invalid month"),
    }
}

pub(crate) fn datetime_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .expect("timestamp millis within the representable range")
}

/// Advances a UTC instant by whole calendar months, keeping the time of day.
/// The day-of-month is clamped to the length of the target month, so
/// Jan 31 + 1 month lands on Feb 28 (or Feb 29 in a leap year).
pub fn add_calendar_months(millis: i64, months: u32) -> i64 {
    let dt = datetime_from_millis(millis);

    let zero_based_month = dt.year() * 12 + dt.month0() as i32 + months as i32;
    let year = zero_based_month.div_euclid(12);
    let month = zero_based_month.rem_euclid(12) as u32 + 1;
    let day = dt.day().min(get_month_length(year, month));

    let date = NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is always valid");
    Utc.from_utc_datetime(&date.and_time(dt.time()))
        .timestamp_millis()
}

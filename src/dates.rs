use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const WEEKS_PER_YEAR: usize = 52;
pub const SCHEDULE_WEEKDAY: Weekday = Weekday::Fri;
/// Upper bound on years a board may span, stored or imported.
pub const MAX_YEARS: u32 = 100;

/// First Friday of the schedule when no epoch is configured.
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 21).unwrap_or(NaiveDate::MIN)
}

pub fn rows_for_years(number_of_years: u32) -> usize {
    number_of_years as usize * WEEKS_PER_YEAR
}

pub fn year_of_row(date_index: usize) -> u32 {
    (date_index / WEEKS_PER_YEAR) as u32
}

/// One date per board row. Each date is `epoch + 7 * i` days, then moved
/// forward a day at a time until it lands on a Friday. Stops early if the
/// calendar runs out.
pub fn generate_dates(epoch: NaiveDate, number_of_years: u32) -> Vec<NaiveDate> {
    (0..rows_for_years(number_of_years))
        .map_while(|week| date_for_row(epoch, week))
        .collect()
}

pub fn date_for_row(epoch: NaiveDate, date_index: usize) -> Option<NaiveDate> {
    let weeks = Duration::try_weeks(i64::try_from(date_index).ok()?)?;
    let mut date = epoch.checked_add_signed(weeks)?;
    while date.weekday() != SCHEDULE_WEEKDAY {
        date = date.succ_opt()?;
    }
    Some(date)
}

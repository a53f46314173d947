use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};

/// Source of "today". Services take a clock so tests can pin the date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The Saturday on or before the given date. Play weeks open on Saturday,
/// so a match recorded mid-week belongs to the Saturday that started it.
pub fn most_recent_saturday(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sat => 0,
        Weekday::Sun => 1,
        other => i64::from(other.num_days_from_monday()) + 2,
    };
    date - Duration::days(back)
}

/// Display label for the week containing `date`, e.g. "15 August".
pub fn week_label(date: NaiveDate) -> String {
    most_recent_saturday(date).format("%d %B").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn saturday_maps_to_itself() {
        assert_eq!(most_recent_saturday(d(2024, 8, 10)), d(2024, 8, 10));
    }

    #[test]
    fn every_weekday_folds_back_to_the_opening_saturday() {
        // 2024-08-10 is a Saturday; the following Fri is still its week.
        for offset in 0..7 {
            let date = d(2024, 8, 10) + Duration::days(offset);
            assert_eq!(most_recent_saturday(date), d(2024, 8, 10));
        }
        assert_eq!(most_recent_saturday(d(2024, 8, 17)), d(2024, 8, 17));
    }

    #[test]
    fn label_uses_day_and_month() {
        assert_eq!(week_label(d(2024, 8, 12)), "10 August");
        assert_eq!(week_label(d(2024, 3, 3)), "02 March");
    }
}

//! Preset time windows for listing recent transactions.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

/// How far back to look when listing transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionWindow {
    /// The last seven days.
    Week,
    /// The last calendar month.
    #[default]
    OneMonth,
    /// The last three calendar months.
    ThreeMonth,
}

impl TransactionWindow {
    /// The earliest transaction date inside the window ending at `now`.
    ///
    /// Month windows step back whole calendar months and clamp the day to the
    /// length of the month they land in, so 31 March minus one month is the
    /// last day of February.
    pub fn cutoff(self, now: OffsetDateTime) -> OffsetDateTime {
        let now = now.to_offset(UtcOffset::UTC);

        let months = match self {
            TransactionWindow::Week => return now - Duration::days(7),
            TransactionWindow::OneMonth => 1,
            TransactionWindow::ThreeMonth => 3,
        };

        match months_before(now.date(), months) {
            Some(date) => now.replace_date(date),
            // Only reachable within a few months of the earliest representable date.
            None => Date::MIN.midnight().assume_utc(),
        }
    }
}

fn months_before(date: Date, months: u8) -> Option<Date> {
    let zero_based_month = i32::from(u8::from(date.month())) - 1 - i32::from(months);
    let year = date.year() + zero_based_month.div_euclid(12);
    let month_number = u8::try_from(zero_based_month.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month_number).ok()?;
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).ok()
}

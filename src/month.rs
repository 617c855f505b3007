//! Month names in Portuguese and a year-month value for month pickers and calendars.

use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use time::{Date, Month};

use crate::Error;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// All months in calendar order.
pub fn all_months() -> &'static [Month] {
    &MONTHS
}

/// The Portuguese name of `month`, e.g. "Março".
pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Janeiro",
        Month::February => "Fevereiro",
        Month::March => "Março",
        Month::April => "Abril",
        Month::May => "Maio",
        Month::June => "Junho",
        Month::July => "Julho",
        Month::August => "Agosto",
        Month::September => "Setembro",
        Month::October => "Outubro",
        Month::November => "Novembro",
        Month::December => "Dezembro",
    }
}

/// Parse a Portuguese month name, ignoring case and surrounding whitespace.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `name` is not a month name.
pub fn parse_month_name(name: &str) -> Result<Month, Error> {
    let trimmed = name.trim();

    MONTHS
        .iter()
        .copied()
        .find(|month| month_name(*month).to_lowercase() == trimmed.to_lowercase())
        .ok_or_else(|| Error::InvalidMonth(name.to_owned()))
}

/// Years accepted from URLs. A six week grid around any of their months stays within [Date].
const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9998;

/// A month of a specific year, written as "YYYY-MM" in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn first_day(self) -> Date {
        // Day 1 exists in every month of the years `time` supports.
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    pub fn last_day(self) -> Date {
        self.next()
            .first_day()
            .previous_day()
            .unwrap_or(Date::MAX)
    }

    pub fn number_of_days(self) -> u8 {
        self.last_day().day()
    }

    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.next()),
        }
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// A heading for the month, e.g. "Outubro de 2025".
    pub fn label(self) -> String {
        format!("{} de {}", month_name(self.month), self.year)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        if !SUPPORTED_YEARS.contains(&year) {
            return Err(invalid());
        }

        Ok(Self::new(year, month))
    }
}

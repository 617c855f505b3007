use std::ops::RangeInclusive;

use serde::Deserialize;
use time::{Date, Duration, Month};

/// The period of time covered by the reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    /// The last seven days.
    Week,
    /// The current calendar month.
    #[default]
    Month,
    /// The current calendar year.
    Year,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 3] = [TimeFilter::Week, TimeFilter::Month, TimeFilter::Year];

    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::Week => "Semana",
            TimeFilter::Month => "Mês",
            TimeFilter::Year => "Ano",
        }
    }

    /// The value used for the filter in query strings.
    pub fn query_value(self) -> &'static str {
        match self {
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
        }
    }

    /// The dates the filter keeps relative to `today`.
    ///
    /// The week has no upper bound so that transactions dated in the future
    /// are still reported.
    pub fn date_range(self, today: Date) -> RangeInclusive<Date> {
        match self {
            TimeFilter::Week => (today - Duration::days(7))..=Date::MAX,
            TimeFilter::Month => {
                let first = today.replace_day(1).unwrap_or(today);
                let last = first.replace_day(today.month().length(today.year())).unwrap_or(today);

                first..=last
            }
            TimeFilter::Year => {
                let first = Date::from_calendar_date(today.year(), Month::January, 1).unwrap_or(today);
                let last =
                    Date::from_calendar_date(today.year(), Month::December, 31).unwrap_or(today);

                first..=last
            }
        }
    }

    pub fn keeps(self, date: Date, today: Date) -> bool {
        self.date_range(today).contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::TimeFilter;

    #[test]
    fn defaults_to_month() {
        assert_eq!(TimeFilter::default(), TimeFilter::Month);
    }

    #[test]
    fn week_keeps_the_last_seven_days() {
        let today = date!(2025 - 10 - 18);

        assert!(TimeFilter::Week.keeps(date!(2025 - 10 - 11), today));
        assert!(TimeFilter::Week.keeps(today, today));
        assert!(TimeFilter::Week.keeps(date!(2025 - 10 - 20), today));
        assert!(!TimeFilter::Week.keeps(date!(2025 - 10 - 10), today));
    }

    #[test]
    fn month_keeps_same_month_and_year() {
        let today = date!(2025 - 10 - 18);

        assert!(TimeFilter::Month.keeps(date!(2025 - 10 - 01), today));
        assert!(TimeFilter::Month.keeps(date!(2025 - 10 - 31), today));
        assert!(!TimeFilter::Month.keeps(date!(2025 - 09 - 30), today));
        assert!(!TimeFilter::Month.keeps(date!(2024 - 10 - 18), today));
    }

    #[test]
    fn year_keeps_same_year() {
        let today = date!(2025 - 10 - 18);

        assert!(TimeFilter::Year.keeps(date!(2025 - 01 - 01), today));
        assert!(TimeFilter::Year.keeps(date!(2025 - 12 - 31), today));
        assert!(!TimeFilter::Year.keeps(date!(2024 - 12 - 31), today));
    }

    #[test]
    fn parses_from_query_value() {
        for filter in TimeFilter::ALL {
            let parsed: TimeFilter =
                serde_urlencoded::from_str::<Vec<(String, TimeFilter)>>(&format!(
                    "period={}",
                    filter.query_value()
                ))
                .unwrap()
                .remove(0)
                .1;

            assert_eq!(parsed, filter);
        }
    }
}

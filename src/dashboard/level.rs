//! User levels earned by recording transactions.

/// A level reached by recording transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// 0 to 10 transactions.
    Bronze,
    /// 11 to 20 transactions.
    Prata,
    /// 21 to 30 transactions.
    Ouro,
    /// 31 transactions or more.
    Diamante,
}

impl Level {
    /// The level for a user with `transaction_count` transactions.
    pub fn for_count(transaction_count: u64) -> Self {
        match transaction_count {
            0..=10 => Level::Bronze,
            11..=20 => Level::Prata,
            21..=30 => Level::Ouro,
            _ => Level::Diamante,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Bronze => "Bronze",
            Level::Prata => "Prata",
            Level::Ouro => "Ouro",
            Level::Diamante => "Diamante",
        }
    }

    /// The inclusive transaction count bounds of the level. The last level has no upper bound.
    fn bounds(self) -> (u64, Option<u64>) {
        match self {
            Level::Bronze => (0, Some(10)),
            Level::Prata => (11, Some(20)),
            Level::Ouro => (21, Some(30)),
            Level::Diamante => (31, None),
        }
    }

    /// Tailwind classes for the progress bar.
    pub(super) fn bar_style(self) -> &'static str {
        match self {
            Level::Bronze => "bg-gradient-to-r from-amber-600 to-yellow-700",
            Level::Prata => "bg-gradient-to-r from-slate-400 to-gray-300",
            Level::Ouro => "bg-gradient-to-r from-yellow-400 to-amber-500",
            Level::Diamante => "bg-gradient-to-r from-purple-500 to-indigo-600",
        }
    }

    /// Tailwind classes for the level name.
    pub(super) fn text_style(self) -> &'static str {
        match self {
            Level::Bronze => "text-amber-700",
            Level::Prata => "text-slate-500",
            Level::Ouro => "text-yellow-500",
            Level::Diamante => "text-purple-600",
        }
    }
}

/// How far a user is through their current level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelProgress {
    pub level: Level,
    /// Progress through the level in the range [0, 100].
    pub percent: f64,
    /// E.g. "3/10 transações", or "42 transações" for the last level.
    pub label: String,
}

impl LevelProgress {
    pub fn new(transaction_count: u64) -> Self {
        let level = Level::for_count(transaction_count);

        match level.bounds() {
            (min, Some(max)) => {
                let level_start = min.saturating_sub(1);
                let in_level = transaction_count.saturating_sub(level_start);
                let level_size = max - level_start;
                let percent = (in_level as f64 / level_size as f64 * 100.0).clamp(0.0, 100.0);

                Self {
                    level,
                    percent,
                    label: format!("{in_level}/{level_size} transações"),
                }
            }
            (_, None) => Self {
                level,
                percent: 100.0,
                label: format!("{transaction_count} transações"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, LevelProgress};

    #[test]
    fn level_boundaries() {
        assert_eq!(Level::for_count(0), Level::Bronze);
        assert_eq!(Level::for_count(10), Level::Bronze);
        assert_eq!(Level::for_count(11), Level::Prata);
        assert_eq!(Level::for_count(20), Level::Prata);
        assert_eq!(Level::for_count(21), Level::Ouro);
        assert_eq!(Level::for_count(30), Level::Ouro);
        assert_eq!(Level::for_count(31), Level::Diamante);
        assert_eq!(Level::for_count(1000), Level::Diamante);
    }

    #[test]
    fn progress_at_start() {
        let progress = LevelProgress::new(0);

        assert_eq!(progress.level, Level::Bronze);
        assert_eq!(progress.percent, 0.0);
        assert_eq!(progress.label, "0/10 transações");
    }

    #[test]
    fn progress_in_first_level() {
        let progress = LevelProgress::new(5);

        assert_eq!(progress.percent, 50.0);
        assert_eq!(progress.label, "5/10 transações");
    }

    #[test]
    fn progress_counts_from_previous_level_max() {
        let progress = LevelProgress::new(11);

        assert_eq!(progress.level, Level::Prata);
        assert_eq!(progress.percent, 10.0);
        assert_eq!(progress.label, "1/10 transações");

        let progress = LevelProgress::new(30);
        assert_eq!(progress.level, Level::Ouro);
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.label, "10/10 transações");
    }

    #[test]
    fn last_level_is_always_full() {
        let progress = LevelProgress::new(42);

        assert_eq!(progress.level, Level::Diamante);
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.label, "42 transações");
    }
}

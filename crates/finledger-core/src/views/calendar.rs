//! Month grid for the calendar (home) view.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;

use super::stats::total_of;
use crate::models::{Transaction, TransactionType};

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

/// A calendar month, displayed and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month '{s}' (expected YYYY-MM)");
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().ok().ok_or_else(invalid)?;
        let month: u32 = month.parse().ok().ok_or_else(invalid)?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub day: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub transactions: Vec<&'a Transaction>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth<'a> {
    pub month: YearMonth,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> CalendarMonth<'a> {
    /// Builds the 42-cell grid starting on the Sunday on or before the 1st.
    pub fn build(month: YearMonth, transactions: &'a [Transaction], today: NaiveDate) -> Self {
        let Some(first) = month.first_day() else {
            return Self {
                month,
                days: Vec::new(),
            };
        };
        let offset = u64::from(first.weekday().num_days_from_sunday());
        let start = first.checked_sub_days(Days::new(offset)).unwrap_or(first);

        let days = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| {
                let on_day: Vec<&Transaction> = transactions
                    .iter()
                    .filter(|t| t.transaction_date == date)
                    .collect();
                CalendarDay {
                    date,
                    day: date.day(),
                    is_current_month: month.contains(date),
                    is_today: date == today,
                    total_income: total_of(on_day.iter().copied(), TransactionType::Income),
                    total_expense: total_of(on_day.iter().copied(), TransactionType::Expense),
                    transactions: on_day,
                }
            })
            .collect();

        Self { month, days }
    }

    /// Rows of seven days, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a>]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a>> {
        self.days.iter().find(|d| d.date == date)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::views::stats::fixtures::txn;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_grid_starts_on_sunday_and_has_42_cells() {
        // 2024-03-01 is a Friday.
        let month: YearMonth = "2024-03".parse().unwrap();
        let grid = CalendarMonth::build(month, &[], date("2024-03-15"));

        assert_eq!(grid.days.len(), GRID_CELLS);
        assert_eq!(grid.days[0].date, date("2024-02-25"));
        assert_eq!(grid.days[0].date.weekday(), Weekday::Sun);
        assert!(!grid.days[0].is_current_month);
        assert!(grid.days[5].is_current_month);
        assert_eq!(grid.days[5].day, 1);
        assert_eq!(grid.weeks().count(), 6);
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_leading_days() {
        // 2024-09-01 is a Sunday.
        let grid = CalendarMonth::build("2024-09".parse().unwrap(), &[], date("2024-01-01"));
        assert_eq!(grid.days[0].date, date("2024-09-01"));
        assert!(grid.days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn test_day_totals_and_today_flag() {
        let txns = vec![
            txn(1, "2024-03-05", TransactionType::Income, 1000),
            txn(2, "2024-03-05", TransactionType::Expense, 250),
            txn(3, "2024-03-05", TransactionType::Expense, 50),
            txn(4, "2024-03-05", TransactionType::Transfer, 999),
            txn(5, "2024-03-06", TransactionType::Expense, 10),
        ];
        let grid = CalendarMonth::build("2024-03".parse().unwrap(), &txns, date("2024-03-05"));

        let day = grid.day(date("2024-03-05")).unwrap();
        assert!(day.is_today);
        assert_eq!(day.transactions.len(), 4);
        assert_eq!(day.total_income, Decimal::new(1000, 0));
        assert_eq!(day.total_expense, Decimal::new(300, 0));

        let next = grid.day(date("2024-03-06")).unwrap();
        assert!(!next.is_today);
        assert_eq!(next.total_expense, Decimal::new(10, 0));
    }

    #[test]
    fn test_navigation_wraps_years() {
        let jan: YearMonth = "2024-01".parse().unwrap();
        assert_eq!(jan.previous().to_string(), "2023-12");
        assert_eq!(jan.previous().next(), jan);
        assert_eq!("2023-12".parse::<YearMonth>().unwrap().next(), jan);
    }

    #[test]
    fn test_parse_rejects_bad_months() {
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }
}

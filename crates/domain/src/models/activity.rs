//! Daily activity aggregates for the contribution calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-(user, day) aggregate. Created lazily on first activity of a day,
/// updated afterwards, never deleted. Cancelling a participation does not
/// roll the day back: the calendar records "did something", not net state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyActivity {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub action_count: i32,
    /// 0-4 bucketed intensity derived from `action_count`.
    pub contribution_level: i16,
}

/// One calendar day as served to clients. Days without a stored row are
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub action_count: i32,
    pub contribution_level: i16,
}

/// Expands sparse activity rows into one entry per day in `[from, to]`
/// inclusive, ascending, filling gaps with zeros.
///
/// `rows` must be sorted ascending by date (the store returns them that
/// way). Returns an empty vec when `from > to`.
pub fn fill_calendar(from: NaiveDate, to: NaiveDate, rows: &[DailyActivity]) -> Vec<CalendarEntry> {
    let mut entries = Vec::new();
    let mut rows = rows.iter().peekable();

    let mut day = from;
    while day <= to {
        let entry = match rows.peek() {
            Some(row) if row.date == day => {
                let row = rows.next().expect("peeked row");
                CalendarEntry {
                    date: day,
                    action_count: row.action_count,
                    contribution_level: row.contribution_level,
                }
            }
            _ => CalendarEntry {
                date: day,
                action_count: 0,
                contribution_level: 0,
            },
        };
        entries.push(entry);

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn row(date: &str, count: i32, level: i16) -> DailyActivity {
        DailyActivity {
            user_id: Uuid::nil(),
            date: d(date),
            action_count: count,
            contribution_level: level,
        }
    }

    #[test]
    fn test_week_with_two_active_days() {
        let rows = vec![row("2025-03-03", 1, 1), row("2025-03-06", 5, 4)];
        let calendar = fill_calendar(d("2025-03-01"), d("2025-03-07"), &rows);

        assert_eq!(calendar.len(), 7);
        assert_eq!(calendar[2].action_count, 1);
        assert_eq!(calendar[2].contribution_level, 1);
        assert_eq!(calendar[5].action_count, 5);
        assert_eq!(calendar[5].contribution_level, 4);

        for (i, entry) in calendar.iter().enumerate() {
            if i != 2 && i != 5 {
                assert_eq!(entry.action_count, 0);
                assert_eq!(entry.contribution_level, 0);
            }
        }
    }

    #[test]
    fn test_ascending_and_inclusive() {
        let calendar = fill_calendar(d("2025-01-30"), d("2025-02-02"), &[]);
        let dates: Vec<_> = calendar.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![d("2025-01-30"), d("2025-01-31"), d("2025-02-01"), d("2025-02-02")]
        );
    }

    #[test]
    fn test_single_day_range() {
        let rows = vec![row("2025-05-01", 3, 2)];
        let calendar = fill_calendar(d("2025-05-01"), d("2025-05-01"), &rows);
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].action_count, 3);
    }

    #[test]
    fn test_empty_when_from_after_to() {
        assert!(fill_calendar(d("2025-05-02"), d("2025-05-01"), &[]).is_empty());
    }
}

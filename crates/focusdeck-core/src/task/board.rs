//! Board ordering and date-bucket grouping.
//!
//! The board shows tasks in one total order: dated tasks first, ascending
//! by due instant, then undated ones; ties fall back to priority weight.
//! The agenda view partitions that order into six fixed buckets keyed off
//! "today", which callers pass in explicitly so grouping stays
//! deterministic under test.

use chrono::{NaiveDate, Weekday};
use std::cmp::Ordering;

use super::Task;

/// The fixed, ordered agenda buckets. A task lands in exactly one, tested
/// in this order. Empty buckets exist but renderers skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Future,
    NoDate,
}

impl DateBucket {
    pub const ALL: [DateBucket; 6] = [
        DateBucket::Overdue,
        DateBucket::Today,
        DateBucket::Tomorrow,
        DateBucket::ThisWeek,
        DateBucket::Future,
        DateBucket::NoDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DateBucket::Overdue => "Overdue",
            DateBucket::Today => "Today",
            DateBucket::Tomorrow => "Tomorrow",
            DateBucket::ThisWeek => "This Week",
            DateBucket::Future => "Future",
            DateBucket::NoDate => "No Date",
        }
    }
}

/// Sorted tasks partitioned by due-date proximity.
#[derive(Debug, Clone, Default)]
pub struct DateGroups {
    pub overdue: Vec<Task>,
    pub today: Vec<Task>,
    pub tomorrow: Vec<Task>,
    pub this_week: Vec<Task>,
    pub future: Vec<Task>,
    pub no_date: Vec<Task>,
}

impl DateGroups {
    /// Buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (DateBucket, &[Task])> + '_ {
        DateBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.bucket(bucket)))
    }

    pub fn bucket(&self, bucket: DateBucket) -> &[Task] {
        match bucket {
            DateBucket::Overdue => &self.overdue,
            DateBucket::Today => &self.today,
            DateBucket::Tomorrow => &self.tomorrow,
            DateBucket::ThisWeek => &self.this_week,
            DateBucket::Future => &self.future,
            DateBucket::NoDate => &self.no_date,
        }
    }

    pub fn len(&self) -> usize {
        DateBucket::ALL
            .into_iter()
            .map(|bucket| self.bucket(bucket).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, bucket: DateBucket, task: Task) {
        match bucket {
            DateBucket::Overdue => self.overdue.push(task),
            DateBucket::Today => self.today.push(task),
            DateBucket::Tomorrow => self.tomorrow.push(task),
            DateBucket::ThisWeek => self.this_week.push(task),
            DateBucket::Future => self.future.push(task),
            DateBucket::NoDate => self.no_date.push(task),
        }
    }
}

/// Total order for the board: ascending due instant, undated last, then
/// descending priority weight. The sort is stable, so remaining ties keep
/// their prior relative order.
pub fn sort_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare_tasks);
    sorted
}

fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(da), Some(db)) => da.cmp(&db).then_with(|| compare_priority(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_priority(a, b),
    }
}

fn compare_priority(a: &Task, b: &Task) -> Ordering {
    b.priority.weight().cmp(&a.priority.weight())
}

/// Which bucket a due day falls into, relative to `today`.
/// Weeks run Sunday through Saturday.
pub fn bucket_for(task: &Task, today: NaiveDate) -> DateBucket {
    let Some(due) = task.due_date else {
        return DateBucket::NoDate;
    };
    let day = due.date_naive();

    if day < today {
        DateBucket::Overdue
    } else if day == today {
        DateBucket::Today
    } else if Some(day) == today.succ_opt() {
        DateBucket::Tomorrow
    } else if day <= today.week(Weekday::Sun).last_day() {
        DateBucket::ThisWeek
    } else {
        DateBucket::Future
    }
}

/// Sort, then partition into agenda buckets.
pub fn group_by_date(tasks: &[Task], today: NaiveDate) -> DateGroups {
    let mut groups = DateGroups::default();
    for task in sort_tasks(tasks) {
        let bucket = bucket_for(&task, today);
        groups.push(bucket, task);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn task(id: &str, due: Option<DateTime<Utc>>, priority: Priority) -> Task {
        Task {
            id: id.into(),
            owner_id: "owner".into(),
            title: format!("task {id}"),
            description: None,
            status: TaskStatus::Todo,
            priority,
            due_date: due,
            category: None,
            color: None,
            subtasks: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn at(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
    }

    fn monday() -> NaiveDate {
        // A Monday, so "this week" still has days left in it.
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn dated_tasks_precede_undated() {
        let today = monday();
        let tasks = vec![
            task("undated", None, Priority::High),
            task("dated", Some(at(today)), Priority::Low),
        ];
        let sorted = sort_tasks(&tasks);
        assert_eq!(sorted[0].id, "dated");
        assert_eq!(sorted[1].id, "undated");
    }

    #[test]
    fn earlier_due_date_wins_over_priority() {
        let today = monday();
        let tasks = vec![
            task("later-high", Some(at(today) + Duration::days(2)), Priority::High),
            task("sooner-low", Some(at(today)), Priority::Low),
        ];
        let sorted = sort_tasks(&tasks);
        assert_eq!(sorted[0].id, "sooner-low");
    }

    #[test]
    fn priority_breaks_equal_date_ties() {
        let due = at(monday());
        let tasks = vec![
            task("low", Some(due), Priority::Low),
            task("high", Some(due), Priority::High),
            task("medium", Some(due), Priority::Medium),
        ];
        let ids: Vec<_> = sort_tasks(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["high", "medium", "low"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let due = at(monday());
        let tasks = vec![
            task("first", Some(due), Priority::Medium),
            task("second", Some(due), Priority::Medium),
            task("third", Some(due), Priority::Medium),
        ];
        let ids: Vec<_> = sort_tasks(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn undated_bucket_orders_by_priority() {
        let tasks = vec![
            task("low", None, Priority::Low),
            task("high", None, Priority::High),
        ];
        let ids: Vec<_> = sort_tasks(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[test]
    fn due_today_is_today_never_overdue() {
        let today = monday();
        // Any time of day counts, including the first second.
        let midnight = Utc.from_utc_datetime(&today.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(bucket_for(&task("a", Some(midnight), Priority::Medium), today), DateBucket::Today);
        assert_eq!(bucket_for(&task("b", Some(at(today)), Priority::Medium), today), DateBucket::Today);
    }

    #[test]
    fn bucket_assignment_across_the_week() {
        let today = monday();
        let cases = [
            (-1, DateBucket::Overdue),
            (0, DateBucket::Today),
            (1, DateBucket::Tomorrow),
            // Wednesday through Saturday are still this week.
            (2, DateBucket::ThisWeek),
            (5, DateBucket::ThisWeek),
            // Next Sunday starts a new week.
            (6, DateBucket::Future),
            (30, DateBucket::Future),
        ];
        for (offset, expected) in cases {
            let due = at(today) + Duration::days(offset);
            let got = bucket_for(&task("t", Some(due), Priority::Medium), today);
            assert_eq!(got, expected, "offset {offset}");
        }
        assert_eq!(bucket_for(&task("t", None, Priority::Medium), today), DateBucket::NoDate);
    }

    #[test]
    fn tomorrow_beats_this_week_even_at_week_edge() {
        // Saturday: tomorrow is Sunday, which is next week by the calendar,
        // but the Tomorrow bucket is tested first.
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let due = at(saturday) + Duration::days(1);
        assert_eq!(
            bucket_for(&task("t", Some(due), Priority::Medium), saturday),
            DateBucket::Tomorrow
        );
    }

    #[test]
    fn grouping_flattens_back_to_sorted_order() {
        let today = monday();
        let tasks = vec![
            task("future", Some(at(today) + Duration::days(20)), Priority::Low),
            task("yesterday", Some(at(today) - Duration::days(1)), Priority::Low),
            task("none", None, Priority::High),
            task("today", Some(at(today)), Priority::High),
        ];
        let groups = group_by_date(&tasks, today);
        assert_eq!(groups.len(), tasks.len());

        let flattened: Vec<_> = groups
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().map(|t| t.id.clone()))
            .collect();
        let sorted: Vec<_> = sort_tasks(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(flattened, sorted);

        assert_eq!(groups.overdue.len(), 1);
        assert_eq!(groups.today.len(), 1);
        assert_eq!(groups.future.len(), 1);
        assert_eq!(groups.no_date.len(), 1);
        assert!(groups.tomorrow.is_empty());
    }

    proptest! {
        #[test]
        fn every_task_lands_in_exactly_one_bucket(
            offsets in prop::collection::vec(prop::option::of(-60i64..60), 0..40),
            weights in prop::collection::vec(0u8..3, 0..40),
        ) {
            let today = monday();
            let tasks: Vec<Task> = offsets
                .iter()
                .enumerate()
                .map(|(i, offset)| {
                    let priority = match weights.get(i).copied().unwrap_or(1) {
                        0 => Priority::Low,
                        1 => Priority::Medium,
                        _ => Priority::High,
                    };
                    task(&format!("t{i}"), offset.map(|d| at(today) + Duration::days(d)), priority)
                })
                .collect();

            let groups = group_by_date(&tasks, today);
            // Union of buckets equals the input, each task exactly once.
            prop_assert_eq!(groups.len(), tasks.len());
            let mut seen: Vec<_> = groups
                .iter()
                .flat_map(|(_, bucket)| bucket.iter().map(|t| t.id.clone()))
                .collect();
            seen.sort();
            let mut expected: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
            expected.sort();
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn sorted_dated_tasks_are_monotonic(
            offsets in prop::collection::vec(-60i64..60, 0..40),
        ) {
            let today = monday();
            let tasks: Vec<Task> = offsets
                .iter()
                .enumerate()
                .map(|(i, offset)| task(&format!("t{i}"), Some(at(today) + Duration::days(*offset)), Priority::Medium))
                .collect();
            let sorted = sort_tasks(&tasks);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].due_date <= pair[1].due_date);
            }
        }
    }
}

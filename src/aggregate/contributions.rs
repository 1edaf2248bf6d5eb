use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::{AuthorStats, Commit, ContributionSummary, TimelineEntry};

/// Trailing windows relative to a reference instant. Calendar boundaries are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub today_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

impl Windows {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        Self {
            today_start: now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            week_start: now - Duration::days(7),
            month_start: now - Duration::days(30),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    total: usize,
    today: usize,
    last_week: usize,
    last_month: usize,
}

impl Counts {
    fn add(&mut self, at: DateTime<Utc>, windows: &Windows) {
        self.total += 1;
        if at >= windows.today_start {
            self.today += 1;
        }
        if at >= windows.week_start {
            self.last_week += 1;
        }
        if at >= windows.month_start {
            self.last_month += 1;
        }
    }
}

/// Fold one repository's commits into window counts, per-author stats and a
/// per-day timeline.
pub fn aggregate(commits: &[Commit], now: DateTime<Utc>) -> ContributionSummary {
    let windows = Windows::ending_at(now);

    let mut overall = Counts::default();
    let mut per_author: HashMap<&str, Counts> = HashMap::new();
    let mut timeline: HashMap<NaiveDate, TimelineEntry> = HashMap::new();

    for commit in commits {
        overall.add(commit.date, &windows);
        per_author
            .entry(commit.author.as_str())
            .or_default()
            .add(commit.date, &windows);

        let date = commit.date.date_naive();
        let bucket = timeline.entry(date).or_insert_with(|| TimelineEntry {
            date,
            total: 0,
            authors: BTreeMap::new(),
        });
        bucket.total += 1;
        *bucket.authors.entry(commit.author.clone()).or_insert(0) += 1;
    }

    // percentages need the final total, so they come after the pass
    let author_stats = per_author
        .into_iter()
        .map(|(author, counts)| {
            let stats = AuthorStats {
                total_commits: counts.total,
                today_commits: counts.today,
                last_week_commits: counts.last_week,
                last_month_commits: counts.last_month,
                percentage_of_total: percentage(counts.total, overall.total),
            };
            (author.to_string(), stats)
        })
        .collect();

    let mut timeline: Vec<TimelineEntry> = timeline.into_values().collect();
    timeline.sort_by_key(|entry| entry.date);

    ContributionSummary {
        total_commits: overall.total,
        today_commits: overall.today,
        last_week_commits: overall.last_week,
        last_month_commits: overall.last_month,
        author_stats,
        timeline,
    }
}

/// `part / total * 100`, one decimal place. Zero when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn commit(hash: &str, author: &str, date: DateTime<Utc>) -> Commit {
        Commit {
            hash: hash.to_string(),
            date,
            message: format!("commit {hash}"),
            author: author.to_string(),
            links: serde_json::Value::Null,
        }
    }

    #[test]
    fn two_day_scenario() {
        let commits = vec![
            commit("c3", "A", at(2024, 1, 2, 9)),
            commit("c2", "B", at(2024, 1, 1, 11)),
            commit("c1", "A", at(2024, 1, 1, 10)),
        ];

        let summary = aggregate(&commits, at(2024, 1, 2, 12));

        assert_eq!(summary.total_commits, 3);
        assert_eq!(summary.today_commits, 1);
        assert_eq!(summary.last_week_commits, 3);
        assert_eq!(summary.last_month_commits, 3);

        let a = &summary.author_stats["A"];
        assert_eq!(a.total_commits, 2);
        assert_eq!(a.today_commits, 1);
        assert_eq!(a.percentage_of_total, 66.7);
        assert_eq!(summary.author_stats["B"].percentage_of_total, 33.3);

        assert_eq!(
            summary.timeline,
            vec![
                TimelineEntry {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    total: 2,
                    authors: BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 1)]),
                },
                TimelineEntry {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    total: 1,
                    authors: BTreeMap::from([("A".to_string(), 1)]),
                },
            ]
        );
    }

    #[test]
    fn windows_overlap_and_respect_boundaries() {
        let now = at(2024, 3, 31, 12);
        let commits = vec![
            commit("today", "A", at(2024, 3, 31, 0)),
            commit("yesterday", "A", at(2024, 3, 30, 23)),
            commit("week-edge", "A", now - Duration::days(7)),
            commit("month-edge", "A", now - Duration::days(30)),
            commit("too-old", "A", now - Duration::days(30) - Duration::seconds(1)),
        ];

        let summary = aggregate(&commits, now);
        assert_eq!(summary.today_commits, 1);
        assert_eq!(summary.last_week_commits, 3);
        assert_eq!(summary.last_month_commits, 4);
        assert_eq!(summary.total_commits, 5);
    }

    #[test]
    fn empty_repository_has_no_author_stats() {
        let summary = aggregate(&[], at(2024, 1, 2, 12));
        assert_eq!(summary, ContributionSummary::default());
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn totals_and_percentages_add_up() {
        let authors = ["A <a@x>", "B <b@x>", "C <c@x>"];
        let commits: Vec<Commit> = (0..31)
            .map(|i| {
                commit(
                    &format!("h{i}"),
                    authors[i % authors.len()],
                    at(2024, 1, 1, 0) + Duration::hours(i as i64 * 7),
                )
            })
            .collect();

        let summary = aggregate(&commits, at(2024, 1, 10, 0));

        let author_total: usize = summary.author_stats.values().map(|s| s.total_commits).sum();
        assert_eq!(author_total, summary.total_commits);

        let pct_total: f64 = summary
            .author_stats
            .values()
            .map(|s| s.percentage_of_total)
            .sum();
        assert!((pct_total - 100.0).abs() <= 0.1 * authors.len() as f64);

        for entry in &summary.timeline {
            assert_eq!(entry.total, entry.authors.values().sum::<usize>());
        }
        assert!(summary.timeline.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn differently_formatted_authors_stay_distinct() {
        let commits = vec![
            commit("h1", "Ada <ada@x>", at(2024, 1, 1, 10)),
            commit("h2", "ada <ada@x>", at(2024, 1, 1, 11)),
        ];
        let summary = aggregate(&commits, at(2024, 1, 2, 0));
        assert_eq!(summary.author_stats.len(), 2);
        assert_eq!(summary.author_stats["Ada <ada@x>"].percentage_of_total, 50.0);
    }
}

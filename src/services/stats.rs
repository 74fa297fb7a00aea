use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::models::{BookingStatus, Home, HomeCatalog};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingStats {
    pub total_bookings: i64,
    /// Bookings whose tour took place (status `visited`).
    pub confirmed_bookings: i64,
    pub pending_bookings: i64,
    pub not_visited_bookings: i64,
    /// Keyed by facility label; every catalog facility is present.
    pub homes_stats: BTreeMap<String, i64>,
}

pub fn aggregate(
    catalog: &HomeCatalog,
    by_status: &[(BookingStatus, i64)],
    by_home: &[(Home, i64)],
) -> BookingStats {
    let status_count = |wanted: BookingStatus| -> i64 {
        by_status
            .iter()
            .filter(|(status, _)| *status == wanted)
            .map(|(_, count)| count)
            .sum()
    };

    let mut homes_stats: BTreeMap<String, i64> = catalog
        .facilities()
        .iter()
        .map(|f| (f.label.clone(), 0))
        .collect();
    for (home, count) in by_home {
        *homes_stats.entry(catalog.label(*home).to_string()).or_default() += count;
    }

    BookingStats {
        total_bookings: by_status.iter().map(|(_, count)| count).sum(),
        confirmed_bookings: status_count(BookingStatus::Visited),
        pending_bookings: status_count(BookingStatus::Pending),
        not_visited_bookings: status_count(BookingStatus::NotVisited),
        homes_stats,
    }
}

pub fn collect_stats(conn: &Connection, catalog: &HomeCatalog) -> anyhow::Result<BookingStats> {
    let by_status = queries::count_by_status(conn)?;
    let by_home = queries::count_by_home(conn)?;
    Ok(aggregate(catalog, &by_status, &by_home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let stats = aggregate(&HomeCatalog::bellavista(), &[], &[]);
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.homes_stats.len(), 4);
        assert!(stats.homes_stats.values().all(|c| *c == 0));
    }

    #[test]
    fn test_counts_and_invariants() {
        let stats = aggregate(
            &HomeCatalog::bellavista(),
            &[
                (BookingStatus::Pending, 4),
                (BookingStatus::Visited, 2),
                (BookingStatus::NotVisited, 1),
            ],
            &[(Home::Cardiff, 5), (Home::CollegeFields, 2)],
        );

        assert_eq!(stats.total_bookings, 7);
        assert_eq!(stats.confirmed_bookings, 2);
        assert_eq!(stats.pending_bookings, 4);
        assert_eq!(stats.not_visited_bookings, 1);
        assert_eq!(
            stats.total_bookings,
            stats.confirmed_bookings + stats.pending_bookings + stats.not_visited_bookings
        );
        assert_eq!(stats.homes_stats.values().sum::<i64>(), stats.total_bookings);
        assert_eq!(stats.homes_stats["Cardiff"], 5);
        assert_eq!(stats.homes_stats["College Fields"], 2);
        assert_eq!(stats.homes_stats["Barry"], 0);
    }
}

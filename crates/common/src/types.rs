//! Domain types shared across the board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Attraction Types ──────────────────────────────────────────────────

/// Operating status of an attraction as reported by the live feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttractionStatus {
    Operating,
    Down,
    #[default]
    Closed,
    Refurbishment,
}

impl AttractionStatus {
    /// Map a raw feed status. Matching is case-sensitive and anything
    /// unrecognized is treated as closed.
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "OPERATING" => AttractionStatus::Operating,
            "DOWN" => AttractionStatus::Down,
            "CLOSED" => AttractionStatus::Closed,
            "REFURBISHMENT" => AttractionStatus::Refurbishment,
            _ => AttractionStatus::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttractionStatus::Operating => "OPERATING",
            AttractionStatus::Down => "DOWN",
            AttractionStatus::Closed => "CLOSED",
            AttractionStatus::Refurbishment => "REFURBISHMENT",
        }
    }

    /// Only operating attractions report a usable wait time.
    pub fn has_wait_time(&self) -> bool {
        matches!(self, AttractionStatus::Operating)
    }
}

impl std::fmt::Display for AttractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attraction with its current wait data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    /// Standby wait in minutes. `None` means the feed had no figure,
    /// which is not the same as a zero-minute wait.
    pub wait_time: Option<u32>,
    pub status: AttractionStatus,
    pub last_refreshed: DateTime<Utc>,
    /// Boarding-group (virtual queue) entry is offered.
    pub is_virtual_queue: bool,
    /// Paid return time is offered.
    pub fastpass_available: bool,
    /// Single-rider line is offered.
    pub single_rider: bool,
}

// ── Park Types ────────────────────────────────────────────────────────

/// Live snapshot of one park, produced from a single live-data response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkSnapshot {
    pub id: String,
    pub name: String,
    pub timezone: String,
    /// Attractions keyed by attraction id.
    pub attractions: HashMap<String, Attraction>,
    pub last_refreshed: DateTime<Utc>,
}

impl ParkSnapshot {
    /// Attraction name → wait time, optionally restricted to operating rides.
    pub fn wait_times(&self, operating_only: bool) -> HashMap<String, Option<u32>> {
        self.attractions
            .values()
            .filter(|a| !operating_only || a.status == AttractionStatus::Operating)
            .map(|a| (a.name.clone(), a.wait_time))
            .collect()
    }

    /// Operating attractions with a non-zero wait, longest wait first.
    pub fn busiest(&self, limit: usize) -> Vec<&Attraction> {
        let mut operating: Vec<&Attraction> = self
            .attractions
            .values()
            .filter(|a| a.status.has_wait_time() && matches!(a.wait_time, Some(w) if w > 0))
            .collect();
        operating.sort_by(|a, b| {
            b.wait_time
                .cmp(&a.wait_time)
                .then_with(|| a.name.cmp(&b.name))
        });
        operating.truncate(limit);
        operating
    }

    /// Mean of the strictly positive wait times, rounded down.
    pub fn average_wait(&self) -> Option<u32> {
        let waits: Vec<u32> = self
            .attractions
            .values()
            .filter_map(|a| a.wait_time)
            .filter(|w| *w > 0)
            .collect();
        if waits.is_empty() {
            return None;
        }
        let total: u64 = waits.iter().map(|w| u64::from(*w)).sum();
        Some((total / waits.len() as u64) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_attraction(id: &str, name: &str, wait: Option<u32>, status: AttractionStatus) -> Attraction {
        Attraction {
            id: id.into(),
            name: name.into(),
            wait_time: wait,
            status,
            last_refreshed: Utc::now(),
            is_virtual_queue: false,
            fastpass_available: false,
            single_rider: false,
        }
    }

    fn make_park(attractions: Vec<Attraction>) -> ParkSnapshot {
        ParkSnapshot {
            id: "park".into(),
            name: "Test Park".into(),
            timezone: "America/New_York".into(),
            attractions: attractions.into_iter().map(|a| (a.id.clone(), a)).collect(),
            last_refreshed: Utc::now(),
        }
    }

    #[test]
    fn test_status_mapping_is_case_sensitive() {
        assert_eq!(AttractionStatus::from_api("OPERATING"), AttractionStatus::Operating);
        assert_eq!(AttractionStatus::from_api("DOWN"), AttractionStatus::Down);
        assert_eq!(AttractionStatus::from_api("REFURBISHMENT"), AttractionStatus::Refurbishment);
        assert_eq!(AttractionStatus::from_api("operating"), AttractionStatus::Closed);
        assert_eq!(AttractionStatus::from_api("MAINTENANCE"), AttractionStatus::Closed);
        assert_eq!(AttractionStatus::from_api(""), AttractionStatus::Closed);
    }

    #[test]
    fn test_status_serializes_as_feed_string() {
        let json = serde_json::to_string(&AttractionStatus::Refurbishment).expect("serialize");
        assert_eq!(json, "\"REFURBISHMENT\"");
    }

    #[test]
    fn test_busiest_sorts_and_skips_non_operating() {
        let park = make_park(vec![
            make_attraction("a", "Space Mountain", Some(45), AttractionStatus::Operating),
            make_attraction("b", "Haunted Mansion", Some(20), AttractionStatus::Operating),
            make_attraction("c", "Splash Mountain", Some(90), AttractionStatus::Down),
            make_attraction("d", "Carousel", None, AttractionStatus::Operating),
            make_attraction("e", "Mine Train", Some(70), AttractionStatus::Operating),
            make_attraction("f", "Tea Cups", Some(0), AttractionStatus::Operating),
        ]);

        let top: Vec<&str> = park.busiest(2).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(top, vec!["Mine Train", "Space Mountain"]);

        let all: Vec<&str> = park.busiest(10).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(all, vec!["Mine Train", "Space Mountain", "Haunted Mansion"]);
    }

    #[test]
    fn test_average_wait_ignores_zero_and_missing() {
        let park = make_park(vec![
            make_attraction("a", "A", Some(30), AttractionStatus::Operating),
            make_attraction("b", "B", Some(15), AttractionStatus::Operating),
            make_attraction("c", "C", Some(0), AttractionStatus::Operating),
            make_attraction("d", "D", None, AttractionStatus::Closed),
        ]);
        assert_eq!(park.average_wait(), Some(22));

        let empty = make_park(vec![make_attraction("x", "X", Some(0), AttractionStatus::Operating)]);
        assert_eq!(empty.average_wait(), None);
    }

    #[test]
    fn test_wait_times_operating_only() {
        let park = make_park(vec![
            make_attraction("a", "Test Track", Some(40), AttractionStatus::Operating),
            make_attraction("b", "Soarin", None, AttractionStatus::Closed),
        ]);

        let all = park.wait_times(false);
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("Soarin"), Some(&None));

        let operating = park.wait_times(true);
        assert_eq!(operating.len(), 1);
        assert_eq!(operating.get("Test Track"), Some(&Some(40)));
    }
}

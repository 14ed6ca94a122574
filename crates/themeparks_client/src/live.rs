//! Live-data payload mapping.
//!
//! Turns a raw `/entity/{id}/live` response into a [`ParkSnapshot`]. Missing
//! optional fields fall back to defaults and unknown statuses map to closed;
//! neither is an error.

use chrono::{DateTime, Utc};
use common::{Attraction, AttractionStatus, Error, ParkSnapshot};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::SnapshotCache;

pub const UNKNOWN_PARK_NAME: &str = "Unknown Park";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const UNKNOWN_ATTRACTION_NAME: &str = "Unknown";

const ATTRACTION_ENTITY_TYPE: &str = "ATTRACTION";
const STANDBY_QUEUE: &str = "STANDBY";
const BOARDING_GROUP_QUEUE: &str = "BOARDING_GROUP";
const PAID_RETURN_TIME_QUEUE: &str = "PAID_RETURN_TIME";
const SINGLE_RIDER_QUEUE: &str = "SINGLE_RIDER";

// ── Response types ────────────────────────────────────────────────────

/// Response from `/entity/{id}/live`.
///
/// Fields are held as raw values so one badly typed field falls back to its
/// default instead of rejecting the whole park.
#[derive(Debug, Deserialize)]
pub struct LiveDataResponse {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub timezone: Option<Value>,
    #[serde(rename = "liveData", default)]
    pub live_data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LiveDataEntry {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(rename = "entityType", default)]
    pub entity_type: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    /// Queue kinds keyed by name; only key presence and the standby wait
    /// are read.
    #[serde(default)]
    pub queue: Option<Value>,
}

fn text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// Whole, non-negative minutes. `35` and `35.0` both count; anything else
/// is treated as no figure.
fn whole_minutes(value: &Value) -> Option<u32> {
    if let Some(w) = value.as_u64() {
        return u32::try_from(w).ok();
    }
    let w = value.as_f64()?;
    if w.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&w) {
        Some(w as u32)
    } else {
        None
    }
}

impl LiveDataEntry {
    /// Entries that are not JSON objects carry nothing to map.
    fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping malformed liveData entry: {}", e);
                None
            }
        }
    }

    fn is_attraction(&self) -> bool {
        text(&self.entity_type) == Some(ATTRACTION_ENTITY_TYPE)
    }

    fn status(&self) -> AttractionStatus {
        match &self.status {
            Some(Value::String(raw)) => AttractionStatus::from_api(raw),
            Some(Value::Null) | None => AttractionStatus::default(),
            Some(other) => {
                debug!("Non-text status {} treated as closed", other);
                AttractionStatus::default()
            }
        }
    }

    fn into_attraction(self, now: DateTime<Utc>) -> Attraction {
        let status = self.status();
        let queue = self.queue.as_ref().and_then(Value::as_object);
        let has_queue = |kind: &str| queue.is_some_and(|q| q.contains_key(kind));
        let wait_time = queue
            .and_then(|q| q.get(STANDBY_QUEUE))
            .and_then(|standby| standby.get("waitTime"))
            .and_then(whole_minutes);

        Attraction {
            id: text(&self.id).unwrap_or_default().to_string(),
            name: text(&self.name)
                .unwrap_or(UNKNOWN_ATTRACTION_NAME)
                .to_string(),
            wait_time,
            status,
            last_refreshed: now,
            is_virtual_queue: has_queue(BOARDING_GROUP_QUEUE),
            fastpass_available: has_queue(PAID_RETURN_TIME_QUEUE),
            single_rider: has_queue(SINGLE_RIDER_QUEUE),
        }
    }
}

// ── Mapping ───────────────────────────────────────────────────────────

/// Map a live-data payload for `entity_id` into a snapshot stamped `now`.
///
/// Every attraction shares the park's timestamp. Non-attraction entities
/// (shows, restaurants, ...) are skipped, as are entries that are not
/// objects. A badly typed field falls back to its default. Fails only if the
/// payload is not shaped like a live-data response at all.
pub fn map_live_data(
    entity_id: &str,
    payload: Value,
    now: DateTime<Utc>,
) -> Result<ParkSnapshot, Error> {
    let response: LiveDataResponse = serde_json::from_value(payload)?;

    let attractions = response
        .live_data
        .into_iter()
        .filter_map(LiveDataEntry::from_value)
        .filter(LiveDataEntry::is_attraction)
        .map(|entry| {
            let attraction = entry.into_attraction(now);
            (attraction.id.clone(), attraction)
        })
        .collect();

    Ok(ParkSnapshot {
        id: entity_id.to_string(),
        name: text(&response.name)
            .unwrap_or(UNKNOWN_PARK_NAME)
            .to_string(),
        timezone: text(&response.timezone)
            .unwrap_or(DEFAULT_TIMEZONE)
            .to_string(),
        attractions,
        last_refreshed: now,
    })
}

/// Map a fresh payload and store it, replacing any cached snapshot.
pub(crate) fn ingest(
    cache: &SnapshotCache,
    entity_id: &str,
    payload: Value,
) -> Result<Arc<ParkSnapshot>, Error> {
    let snapshot = map_live_data(entity_id, payload, cache.now())?;
    info!(
        "Fetched live data for {}: {} attractions",
        snapshot.name,
        snapshot.attractions.len()
    );
    Ok(cache.insert(snapshot))
}

/// Wait time of the first attraction whose name contains `query`
/// (case-insensitive), if that attraction is operating.
///
/// Only the first match is considered, in whatever order the snapshot's map
/// yields; a closed first match hides any later operating one.
pub fn wait_time_by_name(snapshot: &ParkSnapshot, query: &str) -> Option<u32> {
    let needle = query.to_lowercase();
    let attraction = snapshot
        .attractions
        .values()
        .find(|a| a.name.to_lowercase().contains(&needle))?;

    if attraction.status.has_wait_time() {
        attraction.wait_time
    } else {
        debug!(
            "{} matched '{}' but is {}",
            attraction.name, query, attraction.status
        );
        None
    }
}

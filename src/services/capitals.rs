//! World capitals board: current temperature and live local time for a
//! fixed list of ten capitals.
//!
//! Architecture:
//! - One `CapitalStatus` slot per capital, keyed by time-zone id
//! - Weather refresh fans out one request per capital; each result writes
//!   only its own slot, so completion order does not matter and a failed
//!   capital keeps whatever it showed before
//! - Local times are rewritten by a one-second ticker. The ticker task lives
//!   exactly as long as its `TickerGuard`

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::services::clock::format_time_in;
use crate::services::weather::WeatherClient;

/// Default local-time refresh period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Only current conditions are shown, so one forecast day is enough.
const CAPITAL_FORECAST_DAYS: u8 = 1;

/// Static reference data for one capital.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapitalEntry {
    pub time_zone_id: &'static str,
    pub display_name: &'static str,
    pub country_name: &'static str,
}

pub const CAPITALS: [CapitalEntry; 10] = [
    CapitalEntry {
        time_zone_id: "America/New_York",
        display_name: "Washington, D.C.",
        country_name: "USA",
    },
    CapitalEntry {
        time_zone_id: "Europe/London",
        display_name: "London",
        country_name: "United Kingdom",
    },
    CapitalEntry {
        time_zone_id: "Asia/Tokyo",
        display_name: "Tokyo",
        country_name: "Japan",
    },
    CapitalEntry {
        time_zone_id: "Europe/Berlin",
        display_name: "Berlin",
        country_name: "Germany",
    },
    CapitalEntry {
        time_zone_id: "Australia/Sydney",
        display_name: "Canberra",
        country_name: "Australia",
    },
    CapitalEntry {
        time_zone_id: "America/Toronto",
        display_name: "Ottawa",
        country_name: "Canada",
    },
    CapitalEntry {
        time_zone_id: "America/Sao_Paulo",
        display_name: "Brasília",
        country_name: "Brazil",
    },
    CapitalEntry {
        time_zone_id: "Asia/Shanghai",
        display_name: "Beijing",
        country_name: "China",
    },
    CapitalEntry {
        time_zone_id: "Europe/Moscow",
        display_name: "Moscow",
        country_name: "Russia",
    },
    CapitalEntry {
        time_zone_id: "Europe/Paris",
        display_name: "Paris",
        country_name: "France",
    },
];

/// What the board currently shows for one capital.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapitalStatus {
    pub temperature_c: Option<f64>,
    /// `YYYY-MM-DD HH:MM:SS` in the capital's zone.
    pub local_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CapitalsBoard {
    entries: &'static [CapitalEntry],
    slots: HashMap<&'static str, CapitalStatus>,
    ticks: u64,
}

/// Shared board handle.
pub type SharedCapitalsBoard = Arc<RwLock<CapitalsBoard>>;

impl Default for CapitalsBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl CapitalsBoard {
    pub fn new() -> Self {
        Self::with_entries(&CAPITALS)
    }

    pub fn with_entries(entries: &'static [CapitalEntry]) -> Self {
        Self {
            entries,
            slots: entries
                .iter()
                .map(|e| (e.time_zone_id, CapitalStatus::default()))
                .collect(),
            ticks: 0,
        }
    }

    pub fn shared() -> SharedCapitalsBoard {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn entries(&self) -> &'static [CapitalEntry] {
        self.entries
    }

    pub fn status(&self, time_zone_id: &str) -> Option<&CapitalStatus> {
        self.slots.get(time_zone_id)
    }

    /// Entries paired with their current status, in list order.
    pub fn rows(&self) -> Vec<(CapitalEntry, CapitalStatus)> {
        self.entries
            .iter()
            .map(|e| {
                let status = self.slots.get(e.time_zone_id).cloned().unwrap_or_default();
                (*e, status)
            })
            .collect()
    }

    /// Number of ticker refreshes applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Rewrite every slot's local time for `now`.
    pub fn refresh_times(&mut self, now: DateTime<Utc>) {
        for entry in self.entries {
            match format_time_in(entry.time_zone_id, now) {
                Ok(formatted) => {
                    if let Some(slot) = self.slots.get_mut(entry.time_zone_id) {
                        slot.local_time = Some(formatted);
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Capitals: local time for {} failed: {}",
                        entry.display_name,
                        e
                    );
                }
            }
        }
        self.ticks += 1;
    }

    fn set_temperature(&mut self, time_zone_id: &str, temperature_c: f64) {
        if let Some(slot) = self.slots.get_mut(time_zone_id) {
            slot.temperature_c = Some(temperature_c);
        }
    }
}

/// Fetch current temperature for every capital concurrently.
///
/// Each fetch writes its own slot as soon as it completes, so a slow capital
/// never holds back the others. Returns how many slots were updated.
/// Failures are logged per capital and leave that capital's previous value
/// in place.
pub async fn refresh_weather(board: &SharedCapitalsBoard, client: &WeatherClient) -> usize {
    let entries = board.read().await.entries();

    let fetches = entries.iter().map(|entry| async move {
        match client
            .fetch_forecast_for(entry.display_name, CAPITAL_FORECAST_DAYS)
            .await
        {
            Ok(snapshot) => {
                board
                    .write()
                    .await
                    .set_temperature(entry.time_zone_id, snapshot.current.temp_c);
                true
            }
            Err(e) => {
                tracing::error!("Capitals: weather for {} failed: {}", entry.display_name, e);
                false
            }
        }
    });

    let updated = join_all(fetches).await.into_iter().filter(|ok| *ok).count();

    tracing::info!("Capitals: weather refreshed for {}/{}", updated, entries.len());
    updated
}

/// Handle to a running ticker. Dropping it stops the ticker.
#[derive(Debug)]
pub struct TickerGuard {
    handle: JoinHandle<()>,
}

impl TickerGuard {
    /// Stop the ticker now. Equivalent to dropping the guard.
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Capitals: ticker stopped");
    }
}

/// Shortest accepted ticker period; `tokio::time::interval` rejects zero.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Start refreshing local times every `period` (floored at 1 ms). The first
/// refresh happens immediately.
pub fn start_ticker(board: SharedCapitalsBoard, period: Duration) -> TickerGuard {
    let period = period.max(MIN_TICK_PERIOD);
    tracing::debug!("Capitals: ticker started ({:?})", period);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            board.write().await.refresh_times(Utc::now());
        }
    });

    TickerGuard { handle }
}

//! Flight-state API client.
//!
//! Talks to an OpenSky-style `/states/all` endpoint. State vectors arrive
//! as positional JSON arrays; invalid vectors (no position, no velocity,
//! aircraft on ground) are filtered out before anything downstream sees
//! them. Network failures are retried a fixed number of times with a fixed
//! sleep between attempts before the error propagates.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;

use airways_core::models::{BoundingBox, PositionSample};

pub const DEFAULT_STATES_URL: &str = "https://opensky-network.org/api/states/all";

const REQUEST_RETRY_LIMIT: u32 = 3;
const REQUEST_RETRY_SLEEP: Duration = Duration::from_secs(5);

/// One aircraft state vector as reported by the flight-state API.
#[derive(Debug, Clone)]
pub struct StateVector {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub time_position: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude_m: Option<f64>,
    pub on_ground: bool,
    pub velocity_mps: Option<f64>,
}

impl StateVector {
    /// Parse one positional state array. Returns `None` when the array is
    /// too short to carry a position.
    fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_array()?;
        if fields.len() < 10 {
            return None;
        }
        Some(Self {
            icao24: fields[0].as_str()?.to_string(),
            callsign: fields[1]
                .as_str()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            origin_country: fields[2].as_str().unwrap_or_default().to_string(),
            time_position: fields[3].as_i64(),
            longitude: fields[5].as_f64(),
            latitude: fields[6].as_f64(),
            baro_altitude_m: fields[7].as_f64(),
            on_ground: fields[8].as_bool().unwrap_or(false),
            velocity_mps: fields[9].as_f64(),
        })
    }

    /// An airborne vector with position, altitude, speed and a report time.
    pub fn is_valid(&self) -> bool {
        !self.on_ground
            && self.longitude.is_some()
            && self.latitude.is_some()
            && self.baro_altitude_m.is_some()
            && self.velocity_mps.is_some()
            && self.time_position.is_some()
    }

    /// Convert a valid vector into a position sample. The flight id is the
    /// callsign when present, otherwise the transponder address.
    pub fn to_sample(&self) -> Option<PositionSample> {
        let timestamp: DateTime<Utc> = DateTime::from_timestamp(self.time_position?, 0)?;
        Some(PositionSample {
            flight_id: self
                .callsign
                .clone()
                .unwrap_or_else(|| self.icao24.clone()),
            latitude: self.latitude?,
            longitude: self.longitude?,
            altitude_m: self.baro_altitude_m?,
            speed_mps: self.velocity_mps?,
            timestamp,
        })
    }
}

/// HTTP client for the flight-state API.
pub struct FlightStateClient {
    client: Client,
    base_url: String,
}

impl FlightStateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// All current valid state vectors.
    pub async fn states(&self) -> Result<Vec<StateVector>> {
        let payload = self.request(&[]).await?;
        Ok(parse_states(&payload))
    }

    /// Current valid state vectors within a bounding box.
    pub async fn states_within(&self, bbox: &BoundingBox) -> Result<Vec<StateVector>> {
        let params = [
            ("lamin".to_string(), bbox.min_latitude.to_string()),
            ("lamax".to_string(), bbox.max_latitude.to_string()),
            ("lomin".to_string(), bbox.min_longitude.to_string()),
            ("lomax".to_string(), bbox.max_longitude.to_string()),
        ];
        let payload = self.request(&params).await?;
        Ok(parse_states(&payload))
    }

    /// Current valid state vectors for specific transponder addresses.
    pub async fn states_for_addresses(&self, addresses: &[String]) -> Result<Vec<StateVector>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        let params: Vec<(String, String)> = addresses
            .iter()
            .map(|address| ("icao24".to_string(), address.clone()))
            .collect();
        let payload = self.request(&params).await?;
        Ok(parse_states(&payload))
    }

    /// Transponder address currently flying under a callsign, if any.
    pub async fn address_for_callsign(&self, callsign: &str) -> Result<Option<String>> {
        let states = self.states().await?;
        Ok(address_for(&states, callsign))
    }

    /// Issue one API request with bounded retries.
    ///
    /// Failed attempts sleep a fixed interval and try again up to the
    /// retry limit; the last error propagates.
    async fn request(&self, params: &[(String, String)]) -> Result<Value> {
        let mut attempt = 0u32;
        loop {
            let result = self
                .client
                .get(&self.base_url)
                .query(params)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                Ok(response) => {
                    return response
                        .json()
                        .await
                        .context("flight state response was not valid JSON");
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= REQUEST_RETRY_LIMIT {
                        return Err(err).context(format!(
                            "flight state request failed after {REQUEST_RETRY_LIMIT} attempts"
                        ));
                    }
                    tracing::warn!(attempt, "flight state request failed: {err}, retrying");
                    tokio::time::sleep(REQUEST_RETRY_SLEEP).await;
                }
            }
        }
    }
}

fn address_for(states: &[StateVector], callsign: &str) -> Option<String> {
    states
        .iter()
        .find(|state| state.callsign.as_deref() == Some(callsign))
        .map(|state| state.icao24.clone())
}

fn parse_states(payload: &Value) -> Vec<StateVector> {
    let Some(states) = payload.get("states").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    states
        .iter()
        .filter_map(StateVector::from_value)
        .filter(StateVector::is_valid)
        .collect()
}

//! Device state and scenario tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Battery level (percent) below which the charge plan asks for a priority slot
pub const CRITICAL_BATTERY_THRESHOLD: f64 = 20.0;

/// Default coordinates (downtown San Francisco), used when a request omits them
pub const DEFAULT_LAT: f64 = 37.785;
pub const DEFAULT_LNG: f64 = -122.409;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new(DEFAULT_LAT, DEFAULT_LNG)
    }
}

/// Situational tag selecting a plan template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Low battery: find, route to, and book a charger
    #[default]
    Charge,
    /// Scheduled maintenance: hire diagnostic agents
    Maintenance,
    /// Fleet repositioning for a demand surge
    Fleet,
}

impl Scenario {
    /// The order in which the dashboard cycles through scenarios
    pub const CYCLE: [Scenario; 3] = [Scenario::Charge, Scenario::Maintenance, Scenario::Fleet];

    /// Parse a scenario tag. Absent or unrecognized tags map to `Charge`.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("maintenance") => Self::Maintenance,
            Some("fleet") => Self::Fleet,
            _ => Self::Charge,
        }
    }

    /// Scenario for the given position in the cycle (wraps around)
    pub fn from_cycle_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Maintenance => "maintenance",
            Self::Fleet => "fleet",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the device used as planning input.
///
/// Every field has a default so that a partial or empty request body still
/// produces a usable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceState {
    /// Battery level, 0-100
    pub battery_level: f64,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Wallet balance in USDC
    pub wallet_balance: f64,
    /// Raw scenario tag as sent by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            battery_level: 20.0,
            location: GeoPoint::default(),
            schedule: None,
            wallet_balance: 0.0,
            scenario: None,
        }
    }
}

impl DeviceState {
    pub fn new(battery_level: f64, wallet_balance: f64) -> Self {
        Self {
            battery_level,
            wallet_balance,
            ..Default::default()
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario.as_str().to_string());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = location;
        self
    }

    /// The parsed scenario (unknown tags fall back to `Charge`)
    pub fn scenario(&self) -> Scenario {
        Scenario::parse(self.scenario.as_deref())
    }

    /// Whether the battery is below the priority-booking threshold
    pub fn is_critical(&self) -> bool {
        self.battery_level < CRITICAL_BATTERY_THRESHOLD
    }
}

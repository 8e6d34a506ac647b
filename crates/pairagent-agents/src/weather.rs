//! AtmoSense - hyperlocal weather and battery impact

use crate::{declared_price, now_iso, AGENT_NETWORK};
use pairagent_registry::WEATHER_AGENT;
use pairagent_types::device::{DEFAULT_LAT, DEFAULT_LNG};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherRequest {
    pub lat: f64,
    pub lng: f64,
}

impl Default for WeatherRequest {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
        }
    }
}

pub fn respond(req: &WeatherRequest) -> Value {
    json!({
        "agent": "AtmoSense",
        "agentId": WEATHER_AGENT,
        "_price": declared_price(WEATHER_AGENT),
        "timestamp": now_iso(),
        "location": {"lat": req.lat, "lng": req.lng, "zone": "SF-Downtown-7"},
        "current": {
            "temperature": {"value": 72, "unit": "°F", "feels_like": 70},
            "humidity": 45,
            "wind": {"speed": 5, "direction": "NE", "unit": "mph"},
            "precipitation": {"probability": 0, "type": "none"},
            "visibility": "10+ miles",
            "uvIndex": 4,
            "airQuality": {"index": 42, "label": "Good"},
        },
        "batteryImpact": {
            "temperatureEffect": "+4% efficiency (optimal 65-75°F range)",
            "windEffect": "-0.3% (mild headwind on NE routes)",
            "netImpact": "+3.7% efficiency gain",
            "recommendation": "Optimal driving conditions. No weather-related concerns.",
        },
        "forecast": {
            "next1hr": "Clear, 71°F",
            "next3hr": "Clear, 68°F, wind increasing to 8mph",
            "next6hr": "Partly cloudy, 64°F",
            "precipitation6hr": "0%",
        },
        "recommendation": "Clear skies. +4% battery efficiency from optimal temperature. No weather-related delays expected for the next 3 hours.",
        "metadata": {
            "protocol": "x402",
            "network": AGENT_NETWORK,
            "dataSource": "PairAgent Weather Intelligence Grid",
            "resolution": "500m hyperlocal",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_echoed() {
        let doc = respond(&WeatherRequest { lat: 40.0, lng: -74.0 });
        assert_eq!(doc["location"]["lat"], 40.0);
        assert_eq!(doc["location"]["lng"], -74.0);
    }

    #[test]
    fn test_default_location() {
        let doc = respond(&WeatherRequest::default());
        assert_eq!(doc["location"]["lat"], DEFAULT_LAT);
        assert_eq!(doc["location"]["zone"], "SF-Downtown-7");
    }
}

//! ChargePricer - charging station price comparison

use crate::{declared_price, now_iso, AGENT_NETWORK};
use pairagent_registry::PRICING_AGENT;
use pairagent_types::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingRequest {
    pub location: Option<GeoPoint>,
    /// Search radius in km
    pub radius: f64,
    pub battery_level: f64,
}

impl Default for PricingRequest {
    fn default() -> Self {
        Self {
            location: None,
            radius: 8.0,
            battery_level: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
    pub rate: f64,
    pub unit: &'static str,
    pub distance: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub availability: &'static str,
    pub network: &'static str,
    pub rating: f64,
}

impl Station {
    /// Free bays parsed from the "free/total bays" label
    pub fn free_bays(&self) -> u32 {
        self.availability
            .split('/')
            .next()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStation {
    #[serde(flatten)]
    pub station: Station,
    pub price_rank: usize,
    pub savings_vs_avg: String,
}

/// The fixed station set around downtown San Francisco
pub fn stations() -> Vec<Station> {
    vec![
        station("gc7", "GreenCharge Station #7", 0.12, "2.1km", 37.785, -122.409, "3/8 bays", "GreenCharge", 4.8),
        station("vh1", "VoltHub Central", 0.15, "3.4km", 37.779, -122.418, "1/4 bays", "VoltHub", 4.5),
        station("cp3", "ChargePoint Plaza", 0.18, "1.8km", 37.788, -122.401, "5/12 bays", "ChargePoint", 4.7),
        station("ev2", "EVgo Market St", 0.22, "0.9km", 37.791, -122.399, "0/6 bays", "EVgo", 4.3),
        station("ts1", "Tesla Supercharger Embarcadero", 0.14, "4.8km", 37.795, -122.393, "8/20 bays", "Tesla", 4.9),
    ]
}

#[allow(clippy::too_many_arguments)]
fn station(
    id: &'static str,
    name: &'static str,
    rate: f64,
    distance: &'static str,
    lat: f64,
    lng: f64,
    availability: &'static str,
    network: &'static str,
    rating: f64,
) -> Station {
    Station {
        id,
        name,
        rate,
        unit: "$/kWh",
        distance,
        lat,
        lng,
        availability,
        network,
        rating,
    }
}

/// Available stations sorted by ascending rate, ranked from 1
pub fn rank_stations(all: Vec<Station>) -> (Vec<RankedStation>, f64) {
    let mut available: Vec<Station> = all.into_iter().filter(|s| s.free_bays() > 0).collect();
    available.sort_by(|a, b| a.rate.total_cmp(&b.rate));

    let avg_rate = if available.is_empty() {
        0.0
    } else {
        available.iter().map(|s| s.rate).sum::<f64>() / available.len() as f64
    };

    let ranked = available
        .into_iter()
        .enumerate()
        .map(|(i, station)| {
            let savings = savings_pct(avg_rate, station.rate);
            RankedStation {
                station,
                price_rank: i + 1,
                savings_vs_avg: format!("{:.0}%", savings),
            }
        })
        .collect();

    (ranked, avg_rate)
}

fn savings_pct(avg_rate: f64, rate: f64) -> f64 {
    if avg_rate == 0.0 {
        0.0
    } else {
        (avg_rate - rate) / avg_rate * 100.0
    }
}

pub fn respond(req: &PricingRequest) -> Value {
    let all = stations();
    let scanned = all.len();
    let (ranked, avg_rate) = rank_stations(all);
    let available = ranked.len();

    let recommendation = match ranked.first() {
        Some(best) => format!(
            "{} — lowest rate at ${}/kWh ({:.0}% below area average)",
            best.station.name,
            best.station.rate,
            savings_pct(avg_rate, best.station.rate)
        ),
        None => "No charging bays available within range.".to_string(),
    };

    json!({
        "agent": "ChargePricer",
        "agentId": PRICING_AGENT,
        "_price": declared_price(PRICING_AGENT),
        "timestamp": now_iso(),
        "query": {
            "radius": format!("{}km", req.radius),
            "stationsScanned": scanned,
            "available": available,
        },
        "stations": ranked,
        "recommendation": recommendation,
        "avgAreaRate": format!("${:.3}/kWh", avg_rate),
        "metadata": {
            "protocol": "x402",
            "network": AGENT_NETWORK,
            "dataSource": "PairAgent Pricing Oracle",
            "freshness": "real-time",
        },
    })
}

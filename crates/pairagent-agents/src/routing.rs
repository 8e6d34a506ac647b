//! PathFinder - energy-aware routing

use crate::{declared_price, now_iso, AGENT_NETWORK};
use pairagent_registry::ROUTING_AGENT;
use serde::Deserialize;
use serde_json::{json, Value};

/// Battery percentage consumed by the energy-optimal route
pub const OPTIMAL_ROUTE_DRAIN: f64 = 3.1;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingRequest {
    /// Coordinates or a place tag such as `"gc7"`
    pub origin: Option<Value>,
    pub destination: Option<Value>,
    pub battery_level: f64,
    pub vehicle_type: String,
}

impl Default for RoutingRequest {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            battery_level: 20.0,
            vehicle_type: "EV".to_string(),
        }
    }
}

fn routes() -> Value {
    json!([
        {
            "id": "route-optimal",
            "name": "Energy Optimal",
            "distance": "4.2km",
            "duration": "6 min",
            "energyCost": "3.1%",
            "elevationGain": "12m",
            "trafficDelay": "0 min",
            "score": 95,
            "waypoints": [
                {"lat": 37.785, "lng": -122.409, "name": "Start"},
                {"lat": 37.786, "lng": -122.406, "name": "Oak St"},
                {"lat": 37.785, "lng": -122.401, "name": "GreenCharge #7"},
            ],
        },
        {
            "id": "route-fast",
            "name": "Fastest",
            "distance": "3.8km",
            "duration": "5 min",
            "energyCost": "4.3%",
            "elevationGain": "34m",
            "trafficDelay": "1 min",
            "score": 78,
            "waypoints": [
                {"lat": 37.785, "lng": -122.409, "name": "Start"},
                {"lat": 37.788, "lng": -122.403, "name": "Market St (hill)"},
                {"lat": 37.785, "lng": -122.401, "name": "GreenCharge #7"},
            ],
        },
    ])
}

pub fn respond(req: &RoutingRequest) -> Value {
    let routes = routes();
    let selected = routes[0].clone();

    json!({
        "agent": "PathFinder",
        "agentId": ROUTING_AGENT,
        "_price": declared_price(ROUTING_AGENT),
        "timestamp": now_iso(),
        "routes": routes,
        "selectedRoute": selected,
        "recommendation": "Energy-optimal route via Oak St. Avoids hill on Market St (-1.2% battery savings). ETA: 6 min, 3.1% battery consumption.",
        "energyAnalysis": {
            "currentBattery": format!("{}%", req.battery_level),
            "estimatedArrivalBattery": format!("{:.1}%", req.battery_level - OPTIMAL_ROUTE_DRAIN),
            "regenerativeBraking": "0.4% recovered",
            "hvacImpact": "0.2% additional drain",
        },
        "metadata": {
            "protocol": "x402",
            "network": AGENT_NETWORK,
            "algorithm": "A* with energy weight optimization",
            "vehicleType": req.vehicle_type,
            "destination": req.destination.clone().unwrap_or_else(|| json!("gc7")),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_optimal_selected() {
        let doc = respond(&RoutingRequest::default());
        assert_eq!(doc["routes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["selectedRoute"]["id"], "route-optimal");
    }

    #[test]
    fn test_arrival_battery() {
        let req = RoutingRequest {
            battery_level: 23.0,
            ..Default::default()
        };
        let doc = respond(&req);
        assert_eq!(doc["energyAnalysis"]["currentBattery"], "23%");
        assert_eq!(doc["energyAnalysis"]["estimatedArrivalBattery"], "19.9%");
    }

    #[test]
    fn test_place_tag_destination() {
        let req: RoutingRequest =
            serde_json::from_value(json!({"destination": "nearest_diagnostic", "batteryLevel": 45}))
                .unwrap();
        let doc = respond(&req);
        assert_eq!(doc["metadata"]["destination"], "nearest_diagnostic");
        assert_eq!(doc["energyAnalysis"]["currentBattery"], "45%");
    }
}

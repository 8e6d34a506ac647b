//! SlotNegotiator - charging bay negotiation and booking

use crate::{declared_price, now_iso, AgentContext, AGENT_NETWORK};
use chrono::{Duration, SecondsFormat, Utc};
use pairagent_registry::SLOT_AGENT;
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};

/// Minutes between booking and the start of the reserved session
pub const BOOKING_LEAD_MINUTES: i64 = 6;

pub const DEFAULT_SESSION_MINUTES: i64 = 45;
/// Longest bookable session (one day)
pub const MAX_SESSION_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotRequest {
    pub station_id: String,
    pub preferred_time: Option<String>,
    /// Session length in minutes
    pub duration: i64,
}

impl Default for SlotRequest {
    fn default() -> Self {
        Self {
            station_id: "gc7".to_string(),
            preferred_time: None,
            duration: DEFAULT_SESSION_MINUTES,
        }
    }
}

/// `BK-` followed by the current epoch millis in upper-case base 36
pub fn confirmation_id(millis: u64) -> String {
    format!("BK-{}", to_base36(millis).to_uppercase())
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Random 32-byte mandate hash, `0x`-prefixed
pub fn mandate_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

impl SlotRequest {
    /// Requested session length, clamped to `1..=MAX_SESSION_MINUTES`
    pub fn session_minutes(&self) -> i64 {
        self.duration.clamp(1, MAX_SESSION_MINUTES)
    }
}

pub fn respond(req: &SlotRequest, ctx: &AgentContext) -> Value {
    let now = Utc::now();
    let minutes = req.session_minutes();
    let start = now + Duration::minutes(BOOKING_LEAD_MINUTES);
    let end = start + Duration::minutes(minutes);
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();

    json!({
        "agent": "SlotNegotiator",
        "agentId": SLOT_AGENT,
        "_price": declared_price(SLOT_AGENT),
        "timestamp": now_iso(),
        "negotiation": {
            "protocol": "Google A2A",
            "counterparty": "GreenCharge Station Agent #7",
            "rounds": 2,
            "outcome": "accepted",
            "negotiatedDiscount": "5% off standard rate",
        },
        "booking": {
            "confirmationId": confirmation_id(millis),
            "stationId": req.station_id,
            "station": "GreenCharge Station #7",
            "bay": 3,
            "startTime": start.to_rfc3339_opts(SecondsFormat::Millis, true),
            "endTime": end.to_rfc3339_opts(SecondsFormat::Millis, true),
            "duration": format!("{} min", minutes),
            "rate": "$0.114/kWh (5% negotiated discount)",
            "estimatedCost": "$4.10",
            "cancellationPolicy": "Free cancellation until arrival",
        },
        "authorization": {
            "type": "AP2 Intent Mandate",
            "maxAmount": "$5.00 USDC",
            "scope": "single_charge_session",
            "signedBy": ctx.device.device_id,
            "mandateHash": mandate_hash(),
        },
        "recommendation": "Bay 3 secured at GreenCharge #7. Negotiated 5% discount via A2A. Pre-authorized via AP2 Intent Mandate (max $5.00). Free cancellation until arrival.",
        "metadata": {
            "protocol": "x402 + A2A + AP2",
            "network": AGENT_NETWORK,
            "a2aVersion": "0.3.0",
            "ap2MandateType": "IntentMandate",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pairagent_registry::DeviceProfile;

    #[test]
    fn test_confirmation_id_base36() {
        assert_eq!(confirmation_id(0), "BK-0");
        assert_eq!(confirmation_id(35), "BK-Z");
        assert_eq!(confirmation_id(36), "BK-10");
    }

    #[test]
    fn test_mandate_hash_shape() {
        let hash = mandate_hash();
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_booking_window() {
        let req = SlotRequest {
            duration: 30,
            ..Default::default()
        };
        let doc = respond(&req, &AgentContext::default());
        let start = DateTime::parse_from_rfc3339(doc["booking"]["startTime"].as_str().unwrap()).unwrap();
        let end = DateTime::parse_from_rfc3339(doc["booking"]["endTime"].as_str().unwrap()).unwrap();

        assert_eq!((end - start).num_minutes(), 30);
        assert_eq!(doc["booking"]["duration"], "30 min");
        assert_eq!(doc["negotiation"]["outcome"], "accepted");
    }

    #[test]
    fn test_oversized_duration_is_clamped() {
        let cases = [
            (1_000_000_000_000, MAX_SESSION_MINUTES),
            (i64::MAX, MAX_SESSION_MINUTES),
            (-5, 1),
        ];
        for (duration, expected) in cases {
            let req = SlotRequest {
                duration,
                ..Default::default()
            };
            let doc = respond(&req, &AgentContext::default());
            assert_eq!(doc["booking"]["duration"], format!("{} min", expected));
        }
    }

    #[test]
    fn test_mandate_signed_by_device() {
        let ctx = AgentContext::new(DeviceProfile::default().with_ids(Some("PP-TEST".into()), None));
        let doc = respond(&SlotRequest::default(), &ctx);
        assert_eq!(doc["authorization"]["signedBy"], "PP-TEST");
    }
}

//! 이벤트 디코더.
//!
//! 채널 텍스트 프레임을 타입드 이벤트로 변환한다.
//! 알 수 없는 `type`은 에러가 아니라 무시 대상이다 (전방 호환 정책).
//! 구조가 깨진 페이로드만 에러로 반환되며, 호출자(파이프라인)가
//! 로깅 후 버린다 — 연결 루프나 리듀서로 전파되지 않는다.

use serde::Deserialize;
use tracing::debug;

use gridscope_core::error::CoreError;
use gridscope_core::models::alert::Alert;
use gridscope_core::models::suggestion::RlSuggestion;
use gridscope_core::models::telemetry::Telemetry;

/// 채널에서 수신한 타입드 이벤트
#[derive(Debug, Clone)]
pub enum SiteEvent {
    /// 최신 텔레메트리 — 슬롯 전체 교체
    TelemetryUpdate(Telemetry),
    /// 새 경보 — 피드 맨 앞에 추가
    Alert(Alert),
    /// RL 제안 — 슬롯 전체 교체
    Suggestion(RlSuggestion),
}

/// 와이어 봉투: `{ "type": ..., "payload": ... }`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    /// 알 수 없는 타입은 payload 없이도 와도 된다 — Null로 기본 처리
    #[serde(default)]
    payload: serde_json::Value,
}

/// 프레임 디코드.
///
/// - 인식된 이벤트 → `Ok(Some(event))`
/// - 알 수 없는 `type` → `Ok(None)`
/// - 봉투/페이로드 구조 불량 → `Err`
pub fn decode(raw: &str) -> Result<Option<SiteEvent>, CoreError> {
    let envelope: Envelope = serde_json::from_str(raw)?;

    let event = match envelope.kind.as_str() {
        "telemetry_update" => SiteEvent::TelemetryUpdate(serde_json::from_value(envelope.payload)?),
        "alert" => SiteEvent::Alert(serde_json::from_value(envelope.payload)?),
        "rl_suggestion" => SiteEvent::Suggestion(serde_json::from_value(envelope.payload)?),
        other => {
            debug!("알 수 없는 이벤트 타입 무시: {other}");
            return Ok(None);
        }
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TELEMETRY_FRAME: &str = r#"{
        "type": "telemetry_update",
        "payload": {
            "timestamp": "2026-08-30T09:00:00Z",
            "site_id": "site_123",
            "device_id": "inv_22",
            "subsystem": "inverter",
            "metrics": {
                "voltage": 415.2, "current": 12.1, "frequency": 50.01, "temp_c": 65.0,
                "pv_generation": 250.0, "net_load": 350.0, "battery_discharge": 0.0
            }
        }
    }"#;

    #[test]
    fn decodes_telemetry_update() {
        let event = decode(TELEMETRY_FRAME).unwrap().unwrap();
        assert_matches!(event, SiteEvent::TelemetryUpdate(t) => {
            assert_eq!(t.device_id, "inv_22");
            assert_eq!(t.metrics.pv_generation, Some(250.0));
        });
    }

    #[test]
    fn decodes_alert() {
        let raw = r#"{
            "type": "alert",
            "payload": {
                "id": "alert-9", "timestamp": "2026-08-30T09:05:00Z", "device_id": "batt_04",
                "severity": "warning", "message": "Battery cell voltage imbalance",
                "diagnosis": "Cell 14 shows 5% deviation.",
                "recommended_action": "Initiate cell balancing cycle.",
                "status": "active"
            }
        }"#;

        let event = decode(raw).unwrap().unwrap();
        assert_matches!(event, SiteEvent::Alert(a) => {
            assert_eq!(a.id, "alert-9");
        });
    }

    #[test]
    fn decodes_rl_suggestion() {
        let raw = r#"{
            "type": "rl_suggestion",
            "payload": {
                "id": "rl-1", "timestamp": "2026-08-30T09:10:00Z",
                "action_summary": "Discharge battery to meet load",
                "explanation": ["High grid prices forecasted."],
                "confidence": 0.95, "estimated_cost_savings": 125.5, "status": "pending",
                "current_flows": {
                    "grid_to_load": 150.0, "pv_to_load": 200.0, "pv_to_battery": 50.0,
                    "battery_to_load": 0.0, "battery_to_grid": 0.0, "pv_to_grid": 10.0
                },
                "suggested_flows": {
                    "grid_to_load": 20.0, "pv_to_load": 200.0, "pv_to_battery": 0.0,
                    "battery_to_load": 130.0, "battery_to_grid": 0.0, "pv_to_grid": 10.0
                }
            }
        }"#;

        let event = decode(raw).unwrap().unwrap();
        assert_matches!(event, SiteEvent::Suggestion(s) => {
            assert!(s.is_pending());
        });
    }

    #[test]
    fn unknown_kind_is_silently_ignored() {
        let raw = r#"{ "type": "unknown_kind", "payload": { "whatever": 1 } }"#;
        assert!(decode(raw).unwrap().is_none());
    }

    #[test]
    fn unknown_kind_without_payload_is_silently_ignored() {
        assert!(decode(r#"{ "type": "heartbeat" }"#).unwrap().is_none());
    }

    #[test]
    fn known_kind_without_payload_is_error() {
        assert!(decode(r#"{ "type": "alert" }"#).is_err());
    }

    #[test]
    fn malformed_envelope_is_error() {
        assert!(decode("not json at all").is_err());
        assert!(decode(r#"{ "no_type_field": true }"#).is_err());
    }

    #[test]
    fn malformed_payload_is_error() {
        let raw = r#"{ "type": "alert", "payload": { "id": 42 } }"#;
        assert!(decode(raw).is_err());
    }
}

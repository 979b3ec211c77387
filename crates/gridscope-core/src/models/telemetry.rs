//! 텔레메트리 모델.
//!
//! WebSocket `telemetry_update` 이벤트로 수신하는 실시간 계측 샘플.
//! 코어는 항상 최신 샘플 하나만 유지한다 (히스토리 버퍼는 UI 레이어 관심사).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 실시간 계측 샘플 (서버 → 클라이언트 푸시)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    /// 샘플 생성 시각
    pub timestamp: DateTime<Utc>,
    /// 사이트 ID
    pub site_id: String,
    /// 장비 ID (예: "inv_22")
    pub device_id: String,
    /// 서브시스템 이름 (예: "inverter")
    pub subsystem: String,
    /// 계측값 모음
    pub metrics: TelemetryMetrics,
    /// 파형 데이터 참조 (키 → 스토리지 경로)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform_refs: Option<HashMap<String, String>>,
}

/// 계측값 — 전기 핵심 지표는 필수, 나머지는 장비 종류에 따라 선택
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryMetrics {
    /// 전압 (V)
    pub voltage: f64,
    /// 전류 (A)
    pub current: f64,
    /// 주파수 (Hz)
    pub frequency: f64,
    /// 온도 (°C)
    pub temp_c: f64,
    /// 전고조파 왜율 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thd: Option<f64>,
    /// PV 발전량 (kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_generation: Option<f64>,
    /// PV 일사량 (W/m²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_irradiance: Option<f64>,
    /// 배터리 충전 상태 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc_batt: Option<f64>,
    /// 순부하 (kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_load: Option<f64>,
    /// 배터리 방전량 (kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_discharge: Option<f64>,
}

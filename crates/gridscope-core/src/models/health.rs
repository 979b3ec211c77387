//! 헬스 상태 모델.
//!
//! 60초 주기 REST 폴링으로 수신하는 서브시스템 헬스 스냅샷.
//! 갱신 시 전체 교체되며 부분 병합은 하지 않는다.

use serde::{Deserialize, Serialize};

/// 사이트/서브시스템 헬스 스냅샷
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// 사이트 종합 헬스 (%)
    pub site_health: f64,
    /// 현재 계통 수전량 (kW)
    pub grid_draw: f64,
    /// 배터리 충전 상태 (%)
    pub battery_soc: f64,
    /// 금일 PV 발전량 (kWh)
    pub pv_generation_today: f64,
    /// 배터리 건강도 SOH (%)
    pub battery_soh: f64,
    /// 인버터 헬스 (%)
    pub inverter_health: f64,
    /// 모터 헬스 (%)
    pub motor_health: f64,
    /// PV 시스템 헬스 (%)
    pub pv_health: f64,
    /// EV 충전기 헬스 (%)
    pub ev_charger_health: f64,
}

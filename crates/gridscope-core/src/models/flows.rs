//! 에너지 흐름 모델과 파생 계산.
//!
//! 계통/PV/배터리 3개 노드 사이의 전력 흐름 스냅샷.
//! [`compute_current_flows`]는 최신 텔레메트리와 헬스 스냅샷에서
//! 디스패치 다이어그램용 흐름을 파생하는 순수 함수다.

use serde::{Deserialize, Serialize};

use super::health::HealthStatus;
use super::telemetry::Telemetry;

/// 노드 간 전력 흐름 (kW, 모든 필드 0 이상)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnergyFlows {
    /// 계통 → 부하
    pub grid_to_load: f64,
    /// PV → 부하
    pub pv_to_load: f64,
    /// PV → 배터리
    pub pv_to_battery: f64,
    /// 배터리 → 부하
    pub battery_to_load: f64,
    /// 배터리 → 계통 (V2G)
    pub battery_to_grid: f64,
    /// PV → 계통 (역송전 판매)
    pub pv_to_grid: f64,
}

/// 현재 에너지 흐름 계산.
///
/// 입력이 없는 항목은 0으로 간주하며 실패하지 않는다.
/// PV 발전은 부하 우선으로 배분하고 잉여분은 배터리로 라우팅한다.
/// 역송전 경로(battery_to_grid, pv_to_grid)는 이 두 입력만으로는
/// 모델링하지 않으므로 항상 0이다 — 제안의 흐름 쌍이 표시될 때는
/// 이 계산 자체가 사용되지 않는다.
pub fn compute_current_flows(
    health: Option<&HealthStatus>,
    telemetry: Option<&Telemetry>,
) -> EnergyFlows {
    let metrics = telemetry.map(|t| &t.metrics);
    let pv_generation = metrics.and_then(|m| m.pv_generation).unwrap_or(0.0);
    let net_load = metrics.and_then(|m| m.net_load).unwrap_or(0.0);

    let pv_to_load = pv_generation.min(net_load);

    EnergyFlows {
        grid_to_load: health.map_or(0.0, |h| h.grid_draw),
        pv_to_load,
        pv_to_battery: (pv_generation - pv_to_load).max(0.0),
        battery_to_load: metrics.and_then(|m| m.battery_discharge).unwrap_or(0.0),
        battery_to_grid: 0.0,
        pv_to_grid: 0.0,
    }
}

//! 정비 우선순위 모델.
//!
//! 고장 확률 순으로 랭크된 정비 대상 자산 목록 (REST 조회 전용).

use serde::{Deserialize, Serialize};

/// 정비 대상 자산
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceAsset {
    /// 자산 고유 ID
    pub id: String,
    /// 자산 이름 (예: "Motor 1")
    pub name: String,
    /// 자산 종류 (예: "Inverter")
    #[serde(rename = "type")]
    pub asset_type: String,
    /// 예측 고장 확률 (0.0 ~ 1.0)
    pub failure_probability: f64,
    /// 우선순위 랭크 (1이 최우선)
    pub rank: u32,
}

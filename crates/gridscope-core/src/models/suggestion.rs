//! RL 디스패치 제안 모델.
//!
//! 강화학습 모델(외부 프로듀서)이 산출한 에너지 디스패치 제안.
//! 코어 상태에는 항상 최대 하나만 존재하며, 새 제안 수신 시 전체 교체된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flows::EnergyFlows;

/// RL 디스패치 제안 (서버 → 클라이언트 푸시)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RlSuggestion {
    /// 제안 고유 ID
    pub id: String,
    /// 제안 생성 시각
    pub timestamp: DateTime<Utc>,
    /// 제안 액션 요약 (사람이 읽는 문장)
    pub action_summary: String,
    /// 제안 근거 설명 (표시 순서 유지)
    pub explanation: Vec<String>,
    /// 모델 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 예상 비용 절감액 (통화 단위 무관)
    pub estimated_cost_savings: f64,
    /// 처리 상태
    pub status: SuggestionStatus,
    /// 현재 에너지 흐름 (제안 기준 스냅샷)
    pub current_flows: EnergyFlows,
    /// 제안 적용 시 에너지 흐름
    pub suggested_flows: EnergyFlows,
}

impl RlSuggestion {
    /// 운영자 결정 대기 중인지
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }
}

/// 제안 처리 상태
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// 운영자 결정 대기
    Pending,
    /// 수락됨 (서버 확인 완료 후 전환)
    Accepted,
    /// 거절됨
    Rejected,
}

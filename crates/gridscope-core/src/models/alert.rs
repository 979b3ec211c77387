//! 경보 모델.
//!
//! 서버 푸시 또는 초기 REST 조회로 생성되며, 피드에 최신순으로 누적된다.
//! 코어는 경보를 삭제하지 않는다 — 상태 필드만 제자리에서 변경한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 사이트 경보 (append-only 피드 항목)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// 경보 고유 ID
    pub id: String,
    /// 발생 시각
    pub timestamp: DateTime<Utc>,
    /// 발생 장비 ID
    pub device_id: String,
    /// 심각도
    pub severity: AlertSeverity,
    /// 경보 메시지
    pub message: String,
    /// 진단 내용
    pub diagnosis: String,
    /// 권장 조치
    pub recommended_action: String,
    /// 처리 상태
    pub status: AlertStatus,
}

/// 경보 심각도
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

/// 경보 처리 상태
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// 미처리
    Active,
    /// 운영자 확인 완료
    Acknowledged,
    /// 해소됨
    Resolved,
}

//! REST API 클라이언트 포트.
//!
//! 구현: `gridscope-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::alert::Alert;
use crate::models::health::HealthStatus;
use crate::models::maintenance::MaintenanceAsset;

/// 확인 호출 공통 응답
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AckResponse {
    /// 서버 처리 성공 여부
    pub success: bool,
}

/// 제안 수락 응답
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AcceptResponse {
    /// 서버 처리 성공 여부
    pub success: bool,
    /// 스케줄 안내 문구 (예: "Action scheduled successfully.")
    #[serde(default)]
    pub schedule: String,
}

/// 로그인 응답
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginResponse {
    /// 발급된 JWT
    pub token: String,
}

/// HTTP API 클라이언트
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// 로그인 — JWT 발급
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError>;

    /// 사이트 헬스 스냅샷 조회 (주기 폴링 대상)
    async fn fetch_health_status(&self, site_id: &str) -> Result<HealthStatus, CoreError>;

    /// 경보 목록 조회 (피드 초기 시딩용)
    async fn fetch_alerts(&self, site_id: &str) -> Result<Vec<Alert>, CoreError>;

    /// 경보 확인 처리
    async fn acknowledge_alert(
        &self,
        site_id: &str,
        alert_id: &str,
    ) -> Result<AckResponse, CoreError>;

    /// RL 제안 수락 — 성공 시 스케줄 안내 포함
    async fn accept_suggestion(
        &self,
        site_id: &str,
        suggestion_id: &str,
    ) -> Result<AcceptResponse, CoreError>;

    /// RL 제안 거절
    async fn reject_suggestion(
        &self,
        site_id: &str,
        suggestion_id: &str,
    ) -> Result<AckResponse, CoreError>;

    /// 정비 우선순위 자산 목록 조회
    async fn fetch_maintenance_assets(
        &self,
        site_id: &str,
    ) -> Result<Vec<MaintenanceAsset>, CoreError>;

    /// 자산 정비 일정 등록
    async fn schedule_maintenance(
        &self,
        site_id: &str,
        asset_id: &str,
    ) -> Result<AckResponse, CoreError>;
}

//! HTTP REST API 클라이언트.
//!
//! `ApiClient` 포트 구현. JWT 인증 헤더 자동 주입.
//! 확인 호출(수락/거절/경보 확인)은 자동 재시도하지 않는다 —
//! 실패는 호출자에게 그대로 돌려주고 운영자가 다시 트리거한다.
//! 헬스 조회 실패의 재시도는 폴링 루프의 다음 주기다.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use gridscope_core::error::CoreError;
use gridscope_core::models::alert::Alert;
use gridscope_core::models::health::HealthStatus;
use gridscope_core::models::maintenance::MaintenanceAsset;
use gridscope_core::ports::api_client::{AcceptResponse, AckResponse, ApiClient, LoginResponse};

use crate::auth::SessionManager;

/// REST API 클라이언트 — `ApiClient` 포트 구현
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl HttpApiClient {
    /// 새 HTTP API 클라이언트 생성
    pub fn new(
        base_url: &str,
        session: Arc<SessionManager>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Authorization 헤더가 포함된 요청 빌더 반환
    fn authorized_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, CoreError> {
        let token = self.session.token()?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, &url).bearer_auth(token))
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            401 => Err(CoreError::Auth(format!("인증 실패: {text}"))),
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
        }
    }

    /// 인증된 GET 요청 후 JSON 역직렬화
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let resp = self
            .authorized_request(reqwest::Method::GET, path)?
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| CoreError::Internal(format!("응답 파싱 실패: {e}")))
    }

    /// 인증된 본문 없는 POST 요청 후 JSON 역직렬화
    async fn post_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let resp = self
            .authorized_request(reqwest::Method::POST, path)?
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| CoreError::Internal(format!("응답 파싱 실패: {e}")))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError> {
        debug!("로그인 요청: {email}");

        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("로그인 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| CoreError::Internal(format!("로그인 응답 파싱 실패: {e}")))
    }

    async fn fetch_health_status(&self, site_id: &str) -> Result<HealthStatus, CoreError> {
        debug!("헬스 상태 조회: site={site_id}");
        self.get_json(&format!("/sites/{site_id}/health")).await
    }

    async fn fetch_alerts(&self, site_id: &str) -> Result<Vec<Alert>, CoreError> {
        debug!("경보 목록 조회: site={site_id}");
        self.get_json(&format!("/sites/{site_id}/alerts")).await
    }

    async fn acknowledge_alert(
        &self,
        site_id: &str,
        alert_id: &str,
    ) -> Result<AckResponse, CoreError> {
        debug!("경보 확인 요청: site={site_id} alert={alert_id}");
        self.post_json(&format!("/sites/{site_id}/alerts/{alert_id}/ack"))
            .await
    }

    async fn accept_suggestion(
        &self,
        site_id: &str,
        suggestion_id: &str,
    ) -> Result<AcceptResponse, CoreError> {
        debug!("제안 수락 요청: site={site_id} suggestion={suggestion_id}");
        self.post_json(&format!("/sites/{site_id}/suggestions/{suggestion_id}/accept"))
            .await
    }

    async fn reject_suggestion(
        &self,
        site_id: &str,
        suggestion_id: &str,
    ) -> Result<AckResponse, CoreError> {
        debug!("제안 거절 요청: site={site_id} suggestion={suggestion_id}");
        self.post_json(&format!("/sites/{site_id}/suggestions/{suggestion_id}/reject"))
            .await
    }

    async fn fetch_maintenance_assets(
        &self,
        site_id: &str,
    ) -> Result<Vec<MaintenanceAsset>, CoreError> {
        debug!("정비 자산 조회: site={site_id}");
        self.get_json(&format!("/sites/{site_id}/maintenance")).await
    }

    async fn schedule_maintenance(
        &self,
        site_id: &str,
        asset_id: &str,
    ) -> Result<AckResponse, CoreError> {
        debug!("정비 일정 등록: site={site_id} asset={asset_id}");
        self.post_json(&format!("/sites/{site_id}/maintenance/{asset_id}/schedule"))
            .await
    }
}

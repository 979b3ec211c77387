//! 경보 라이프사이클.
//!
//! 경보 확인(acknowledge)을 confirm-then-commit으로 처리한다.
//! 일괄 확인은 없다 — 경보 id당 호출 하나, id별 in-flight 가드.
//! 피드 초기 시딩(REST 조회)도 여기서 담당한다.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

use gridscope_core::error::CoreError;
use gridscope_core::ports::api_client::ApiClient;

use crate::store::SiteStore;

/// 경보 라이프사이클 관리자
pub struct AlertLifecycle {
    api: Arc<dyn ApiClient>,
    store: Arc<SiteStore>,
    site_id: String,
    /// id별 in-flight 가드 — 같은 경보의 이중 제출 방지
    in_flight: Mutex<HashSet<String>>,
}

impl AlertLifecycle {
    /// 새 라이프사이클 관리자 생성
    pub fn new(api: Arc<dyn ApiClient>, store: Arc<SiteStore>, site_id: &str) -> Self {
        Self {
            api,
            store,
            site_id: site_id.to_string(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// 경보 확인 — 서버 확인 성공 시에만 피드 항목 상태를 제자리 변경
    pub async fn acknowledge(&self, alert_id: &str) -> Result<(), CoreError> {
        if !self.in_flight.lock().insert(alert_id.to_string()) {
            return Err(CoreError::ActionInFlight(format!("alert {alert_id}")));
        }

        let result = self.confirm_and_commit(alert_id).await;
        self.in_flight.lock().remove(alert_id);
        result
    }

    async fn confirm_and_commit(&self, alert_id: &str) -> Result<(), CoreError> {
        let resp = self
            .api
            .acknowledge_alert(&self.site_id, alert_id)
            .await
            .map_err(|e| {
                warn!("경보 확인 호출 실패: {alert_id}: {e}");
                e
            })?;

        if !resp.success {
            warn!("서버가 경보 확인 거부: {alert_id}");
            return Err(CoreError::Internal(format!("경보 확인 거부됨: {alert_id}")));
        }

        if self.store.acknowledge_alert(alert_id) {
            info!("경보 확인 완료: {alert_id}");
            Ok(())
        } else {
            // 피드에 없는 id — 상태 변화 없이 에러로 기록
            error!("확인 커밋 대상 경보 미발견: {alert_id}");
            Err(CoreError::NotFound {
                resource_type: "Alert".to_string(),
                id: alert_id.to_string(),
            })
        }
    }

    /// 피드 초기 시딩 — 비어 있을 때만 REST 조회 결과로 채운다
    pub async fn load_feed(&self) -> Result<(), CoreError> {
        let alerts = self.api.fetch_alerts(&self.site_id).await?;
        self.store.seed_alerts(alerts);
        Ok(())
    }
}

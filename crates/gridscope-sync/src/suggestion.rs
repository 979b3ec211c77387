//! 제안 라이프사이클.
//!
//! pending 제안에 대한 운영자 결정(수락/거절)을 2단계로 처리한다:
//! 서버 확인 호출 → 성공 시에만 로컬 상태 커밋 (confirm-then-commit).
//! 실패 시 상태는 그대로 두고 자동 재시도하지 않는다 — 운영자가
//! 다시 트리거한다. 라이프사이클당 하나의 액션만 in-flight 허용.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use gridscope_core::error::CoreError;
use gridscope_core::models::suggestion::SuggestionStatus;
use gridscope_core::ports::api_client::ApiClient;

use crate::store::SiteStore;

/// 운영자 결정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Accept,
    Reject,
}

/// 제안 라이프사이클 관리자
pub struct SuggestionLifecycle {
    api: Arc<dyn ApiClient>,
    store: Arc<SiteStore>,
    site_id: String,
    /// 액션 in-flight 가드 (라이프사이클 스코프)
    in_flight: AtomicBool,
}

impl SuggestionLifecycle {
    /// 새 라이프사이클 관리자 생성
    pub fn new(api: Arc<dyn ApiClient>, store: Arc<SiteStore>, site_id: &str) -> Self {
        Self {
            api,
            store,
            site_id: site_id.to_string(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 제안 수락 — 성공 시 서버의 스케줄 안내 문구 반환
    pub async fn accept(&self, suggestion_id: &str) -> Result<String, CoreError> {
        self.resolve(suggestion_id, Decision::Accept).await
    }

    /// 제안 거절
    pub async fn reject(&self, suggestion_id: &str) -> Result<(), CoreError> {
        self.resolve(suggestion_id, Decision::Reject).await?;
        Ok(())
    }

    /// 결정 처리 공통 로직
    async fn resolve(&self, suggestion_id: &str, decision: Decision) -> Result<String, CoreError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(CoreError::ActionInFlight(format!(
                "suggestion {suggestion_id}"
            )));
        }

        let result = self.confirm_and_commit(suggestion_id, decision).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn confirm_and_commit(
        &self,
        suggestion_id: &str,
        decision: Decision,
    ) -> Result<String, CoreError> {
        let (success, schedule, committed_status) = match decision {
            Decision::Accept => {
                let resp = self
                    .api
                    .accept_suggestion(&self.site_id, suggestion_id)
                    .await
                    .map_err(|e| {
                        warn!("제안 수락 확인 실패: {suggestion_id}: {e}");
                        e
                    })?;
                (resp.success, resp.schedule, SuggestionStatus::Accepted)
            }
            Decision::Reject => {
                let resp = self
                    .api
                    .reject_suggestion(&self.site_id, suggestion_id)
                    .await
                    .map_err(|e| {
                        warn!("제안 거절 확인 실패: {suggestion_id}: {e}");
                        e
                    })?;
                (resp.success, String::new(), SuggestionStatus::Rejected)
            }
        };

        if !success {
            warn!("서버가 제안 처리 거부: {suggestion_id}");
            return Err(CoreError::Internal(format!(
                "제안 처리 거부됨: {suggestion_id}"
            )));
        }

        // 확인이 오가는 사이 제안이 교체됐으면 커밋하지 않는다
        if self.store.set_suggestion_status(suggestion_id, committed_status) {
            info!("제안 {suggestion_id} → {committed_status:?}");
        }

        Ok(schedule)
    }
}

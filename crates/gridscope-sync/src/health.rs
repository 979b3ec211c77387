//! 주기적 헬스 갱신.
//!
//! 사이트 헬스 스냅샷은 채널이 아니라 REST 폴링으로 온다.
//! 인증된 동안 고정 주기로 조회해 상태 컨테이너의 스냅샷을 교체하고,
//! 조회 실패 시에는 이전 스냅샷을 유지한다 (한 주기 놓침 허용).
//! 게이트가 내려가면 폴링을 멈추고 헬스를 비운다.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use gridscope_core::ports::api_client::ApiClient;

use crate::store::SiteStore;

/// 헬스 스냅샷 갱신 루프
pub struct HealthRefresher {
    api: Arc<dyn ApiClient>,
    store: Arc<SiteStore>,
    site_id: String,
    interval: Duration,
    enabled_rx: watch::Receiver<bool>,
}

impl HealthRefresher {
    /// 새 갱신 루프 생성
    pub fn new(
        api: Arc<dyn ApiClient>,
        store: Arc<SiteStore>,
        site_id: &str,
        interval: Duration,
        enabled_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            store,
            site_id: site_id.to_string(),
            interval,
            enabled_rx,
        }
    }

    /// 갱신 루프 시작
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 갱신 루프 (블로킹) — 게이트 송신측이 소멸하면 종료
    pub async fn run(mut self) {
        loop {
            if !*self.enabled_rx.borrow_and_update() {
                self.store.clear_health();
                if self.enabled_rx.changed().await.is_err() {
                    debug!("헬스 갱신 루프 종료");
                    return;
                }
                continue;
            }

            self.refresh_once().await;

            let interval = self.interval;
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = self.enabled_rx.wait_for(|enabled| !enabled) => {
                    if changed.is_err() {
                        debug!("헬스 갱신 루프 종료");
                        return;
                    }
                }
            }
        }
    }

    /// 1회 조회 — 실패하면 이전 스냅샷 유지
    async fn refresh_once(&self) {
        match self.api.fetch_health_status(&self.site_id).await {
            Ok(health) => self.store.replace_health(health),
            Err(e) => warn!("헬스 스냅샷 조회 실패, 이전 값 유지: {e}"),
        }
    }
}

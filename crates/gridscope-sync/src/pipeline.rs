//! 동기화 파이프라인.
//!
//! 드라이버가 전달한 프레임을 수신 순서 그대로 디코드해 상태 컨테이너에
//! 적용하는 단일 순차 루프. 리듀서 적용이 전부 이 태스크 안에서
//! 일어나므로 이벤트 재정렬/배칭이 없고 별도 잠금 규율도 필요 없다.
//! 디코드 실패는 로깅 후 버린다 — 루프는 죽지 않는다.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::decoder;
use crate::store::SiteStore;

/// 동기화 파이프라인 — 프레임 → 이벤트 → 상태
pub struct SyncPipeline {
    store: Arc<SiteStore>,
}

impl SyncPipeline {
    /// 새 파이프라인 생성
    pub fn new(store: Arc<SiteStore>) -> Self {
        Self { store }
    }

    /// 수신 루프 시작
    pub fn spawn(self, raw_rx: mpsc::Receiver<String>) -> JoinHandle<()> {
        tokio::spawn(self.run(raw_rx))
    }

    /// 수신 루프 (블로킹) — 송신측이 모두 소멸하면 종료
    pub async fn run(self, mut raw_rx: mpsc::Receiver<String>) {
        while let Some(raw) = raw_rx.recv().await {
            match decoder::decode(&raw) {
                Ok(Some(event)) => self.store.apply(event),
                Ok(None) => {}
                Err(e) => warn!("프레임 디코드 실패, 버림: {e}"),
            }
        }
        debug!("동기화 파이프라인 종료");
    }
}

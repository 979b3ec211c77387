//! 세션(JWT) 관리.
//!
//! 토큰 보관과 인증 게이트를 담당한다. 인증 여부는 watch 채널로
//! 브로드캐스트되어 연결 드라이버와 헬스 갱신 태스크의 `enabled`
//! 게이트로 쓰인다. 토큰의 영속 저장은 외부(호스트 앱) 책임이다.

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::info;

use gridscope_core::error::CoreError;

/// 세션 관리자 — JWT 보관 + 인증 게이트
pub struct SessionManager {
    token: RwLock<Option<String>>,
    auth_tx: watch::Sender<bool>,
    auth_rx: watch::Receiver<bool>,
}

impl SessionManager {
    /// 비인증 상태로 생성
    pub fn new() -> Self {
        let (auth_tx, auth_rx) = watch::channel(false);
        Self {
            token: RwLock::new(None),
            auth_tx,
            auth_rx,
        }
    }

    /// 로그인 — 토큰 저장 후 게이트 개방
    pub fn login(&self, token: String) {
        *self.token.write() = Some(token);
        let _ = self.auth_tx.send(true);
        info!("세션 시작 — 실시간 동기화 활성화");
    }

    /// 로그아웃 — 게이트 폐쇄 후 토큰 폐기
    pub fn logout(&self) {
        let _ = self.auth_tx.send(false);
        *self.token.write() = None;
        info!("세션 종료 — 실시간 동기화 비활성화");
    }

    /// 현재 인증 여부
    pub fn is_authenticated(&self) -> bool {
        *self.auth_rx.borrow()
    }

    /// 현재 토큰 조회
    pub fn token(&self) -> Result<String, CoreError> {
        self.token
            .read()
            .clone()
            .ok_or_else(|| CoreError::Auth("세션 토큰 없음".to_string()))
    }

    /// 인증 게이트 수신기 생성 (드라이버/헬스 갱신용)
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.auth_rx.clone()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

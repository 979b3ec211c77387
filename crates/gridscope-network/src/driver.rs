//! 연결 드라이버.
//!
//! 이벤트 채널 하나의 수명주기를 관리한다: 연결 → 수신 → 끊김 →
//! exponential backoff 재연결. 인증 게이트(watch)가 닫히면 채널을
//! 내리고 대기 중인 재시도 타이머도 취소한다.
//!
//! 상태 기계: `Disconnected → Connecting → Connected → Disconnected → …`
//! 게이트가 열려 있는 한 종료 상태는 없다 — 영원히 재시도한다.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use gridscope_core::ports::channel::{ChannelMessage, EventChannel};

/// 연결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// 연결 끊김 (게이트 폐쇄 포함)
    Disconnected,
    /// 연결 시도 중
    Connecting,
    /// 연결됨
    Connected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connecting => write!(f, "Connecting"),
            ConnectionStatus::Connected => write!(f, "Connected"),
        }
    }
}

/// 재연결 backoff 정책 — `min(base · 2^attempt, max)`
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base: Duration,
    max: Duration,
}

impl BackoffPolicy {
    /// 새 정책 생성
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// 밀리초 단위로 생성 (설정값 연동용)
    pub fn from_millis(base_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(max_ms))
    }

    /// `attempt`번째 실패 후 대기 시간
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_millis(1_000, 30_000)
    }
}

/// 수신 펌프 종료 사유
enum PumpExit {
    /// 서버 측 종료 또는 전송 에러 — 재연결 대상
    Closed,
    /// 게이트 폐쇄 — 재연결 없이 대기
    Disabled,
    /// 소비자/게이트 소멸 — 드라이버 종료
    Shutdown,
}

/// 연결 드라이버
///
/// [`spawn`](ConnectionDriver::spawn)으로 백그라운드 태스크를 띄우고
/// [`DriverHandle`]로 상태를 구독한다. 수신한 텍스트 프레임은
/// `raw_tx`로 수신 순서 그대로 전달된다.
pub struct ConnectionDriver {
    channel: Arc<dyn EventChannel>,
    raw_tx: mpsc::Sender<String>,
    enabled_rx: watch::Receiver<bool>,
    status_tx: watch::Sender<ConnectionStatus>,
    backoff: BackoffPolicy,
}

impl ConnectionDriver {
    /// 새 드라이버 생성
    pub fn new(
        channel: Arc<dyn EventChannel>,
        raw_tx: mpsc::Sender<String>,
        enabled_rx: watch::Receiver<bool>,
        backoff: BackoffPolicy,
    ) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            channel,
            raw_tx,
            enabled_rx,
            status_tx,
            backoff,
        }
    }

    /// 드라이버 태스크 시작
    pub fn spawn(self) -> DriverHandle {
        let status_rx = self.status_tx.subscribe();
        let task = tokio::spawn(self.run());
        DriverHandle { status_rx, task }
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status_tx.send_if_modified(|current| {
            if *current != status {
                *current = status;
                true
            } else {
                false
            }
        });
    }

    async fn run(mut self) {
        let mut attempt: u32 = 0;

        loop {
            if !*self.enabled_rx.borrow() {
                self.set_status(ConnectionStatus::Disconnected);
                attempt = 0;
                if self.enabled_rx.changed().await.is_err() {
                    return;
                }
                continue;
            }

            self.set_status(ConnectionStatus::Connecting);
            match self.channel.open().await {
                Ok(messages) => {
                    info!("이벤트 채널 연결됨");
                    self.set_status(ConnectionStatus::Connected);
                    attempt = 0;

                    match Self::pump(&mut self.enabled_rx, &self.raw_tx, messages).await {
                        PumpExit::Closed => {
                            warn!("이벤트 채널 끊김 — 재연결 예정");
                        }
                        PumpExit::Disabled => {
                            // 수신기를 버려 핸들러를 먼저 분리했으므로
                            // 이 종료는 재연결 스케줄러로 되돌아오지 않는다
                            info!("게이트 폐쇄 — 이벤트 채널 해제");
                            self.set_status(ConnectionStatus::Disconnected);
                            continue;
                        }
                        PumpExit::Shutdown => {
                            self.set_status(ConnectionStatus::Disconnected);
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("이벤트 채널 연결 실패: {e}");
                }
            }

            self.set_status(ConnectionStatus::Disconnected);

            if !*self.enabled_rx.borrow() {
                continue;
            }

            let delay = self.backoff.delay(attempt);
            attempt = attempt.saturating_add(1);
            debug!("재연결 대기: {delay:?} (시도 {attempt})");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = self.enabled_rx.wait_for(|enabled| !enabled) => {
                    if changed.is_err() {
                        return;
                    }
                    debug!("게이트 폐쇄 — 재연결 타이머 취소");
                }
            }
        }
    }

    /// 연결 유지 중 수신 펌프 — 프레임을 순서대로 `raw_tx`에 전달
    async fn pump(
        enabled_rx: &mut watch::Receiver<bool>,
        raw_tx: &mpsc::Sender<String>,
        mut messages: mpsc::Receiver<ChannelMessage>,
    ) -> PumpExit {
        loop {
            tokio::select! {
                msg = messages.recv() => match msg {
                    Some(ChannelMessage::Text(text)) => {
                        if raw_tx.send(text).await.is_err() {
                            return PumpExit::Shutdown;
                        }
                    }
                    Some(ChannelMessage::Close) | None => return PumpExit::Closed,
                },
                // watch::Ref를 분기 안에서 bool로 풀어준다 (태스크 Send 유지)
                gate_alive = async { enabled_rx.wait_for(|enabled| !enabled).await.is_ok() } => {
                    return if gate_alive {
                        PumpExit::Disabled
                    } else {
                        PumpExit::Shutdown
                    };
                }
            }
        }
    }
}

/// 드라이버 핸들 — 상태 구독 및 강제 종료
pub struct DriverHandle {
    status_rx: watch::Receiver<ConnectionStatus>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// 현재 연결 상태
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// 상태 변경 수신기 생성
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// 드라이버 태스크 강제 종료
    pub fn abort(&self) {
        self.task.abort();
    }
}

//! WebSocket 이벤트 채널.
//!
//! `EventChannel` 포트 구현. `tokio-tungstenite` 기반 수신 전용 스트림.
//! 재연결은 이 모듈의 책임이 아니다 — [`crate::driver`]가 담당한다.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};
use url::Url;

use gridscope_core::error::CoreError;
use gridscope_core::ports::channel::{ChannelMessage, EventChannel};

use crate::auth::SessionManager;

/// 수신 메시지 버퍼 크기
const CHANNEL_BUFFER: usize = 64;

/// WebSocket 이벤트 채널 — `EventChannel` 포트 구현
pub struct WsEventChannel {
    base_url: String,
    site_id: String,
    session: Arc<SessionManager>,
}

impl WsEventChannel {
    /// 새 채널 생성
    pub fn new(base_url: &str, site_id: &str, session: Arc<SessionManager>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            site_id: site_id.to_string(),
            session,
        }
    }

    /// 사이트 스트림 엔드포인트 URL 구성
    fn endpoint(&self, token: &str) -> Result<Url, CoreError> {
        let raw = format!("{}/ws/site/{}", self.base_url, self.site_id);
        let mut url = Url::parse(&raw)
            .map_err(|e| CoreError::Config(format!("WebSocket URL 파싱 실패: {e}")))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    /// 수신 루프 — 서버 프레임을 `ChannelMessage`로 변환해 전달
    ///
    /// 드라이버가 수신기를 버리면 `tx.closed()`로 즉시 감지해 스트림을
    /// 내린다. 텍스트 프레임이 올 때까지 소켓이 살아남지 않는다.
    async fn read_loop<S>(mut read: S, tx: mpsc::Sender<ChannelMessage>)
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if tx.send(ChannelMessage::Text(text.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        // 이 프로토콜은 JSON 텍스트만 사용한다
                        debug!("바이너리 프레임 무시");
                    }
                    Some(Ok(Message::Close(_))) => {
                        let _ = tx.send(ChannelMessage::Close).await;
                        break;
                    }
                    Some(Ok(_)) => {} // Ping/Pong은 자동 처리
                    Some(Err(e)) => {
                        warn!("WebSocket 수신 에러: {e}");
                        let _ = tx.send(ChannelMessage::Close).await;
                        break;
                    }
                    None => break,
                },
                _ = tx.closed() => {
                    // 드라이버가 수신기를 버림 — 의도된 종료
                    debug!("수신기 해제 — 스트림 종료");
                    break;
                }
            }
        }
        debug!("WebSocket 수신 루프 종료");
    }
}

#[async_trait]
impl EventChannel for WsEventChannel {
    async fn open(&self) -> Result<mpsc::Receiver<ChannelMessage>, CoreError> {
        let token = self.session.token()?;
        let url = self.endpoint(&token)?;

        info!("WebSocket 연결: {}", url.as_str().split('?').next().unwrap_or(""));

        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| CoreError::Network(format!("WebSocket 연결 실패: {e}")))?;

        let (_write, read) = ws_stream.split();
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);

        // 수신 태스크
        tokio::spawn(Self::read_loop(read, tx));

        Ok(rx)
    }
}

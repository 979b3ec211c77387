//! 실시간 이벤트 채널 포트.
//!
//! 서버가 이벤트를 푸시하는 지속 연결 하나를 추상화한다.
//! 구현: `gridscope-network::ws_channel` (tokio-tungstenite)

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::CoreError;

/// 채널에서 수신한 메시지
#[derive(Debug, Clone)]
pub enum ChannelMessage {
    /// 텍스트 프레임 (JSON 이벤트)
    Text(String),
    /// 연결 종료
    Close,
}

/// 이벤트 채널 — 연결 드라이버가 열고 닫는 단일 라이브 연결
///
/// `open`이 성공하면 수신 스트림을 mpsc 수신기로 반환한다.
/// 수신기 drop이 곧 연결 해제다: 드라이버가 핸들을 버리면
/// 채널 쪽 수신 루프는 조용히 종료된다 (종료로 인한 close가
/// 재연결 스케줄러로 되돌아오지 않는다).
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// 채널 연결 수립 및 수신 스트림 반환
    async fn open(&self) -> Result<mpsc::Receiver<ChannelMessage>, CoreError>;
}

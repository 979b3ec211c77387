//! # gridscope-network
//!
//! HTTP/WebSocket 네트워크 어댑터.
//! 서버와의 REST API 호출, 실시간 WebSocket 이벤트 채널,
//! 세션(JWT) 관리와 재연결 드라이버를 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use gridscope_network::auth::SessionManager;
//! use gridscope_network::driver::{BackoffPolicy, ConnectionDriver};
//! use gridscope_network::http_client::HttpApiClient;
//! use gridscope_network::ws_channel::WsEventChannel;
//! ```

pub mod auth;
pub mod driver;
pub mod http_client;
pub mod ws_channel;

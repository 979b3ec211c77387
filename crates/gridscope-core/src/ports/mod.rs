//! Hexagonal Architecture 포트 인터페이스.
//!
//! 구현은 어댑터 crate에 있다: `gridscope-network` (reqwest, tokio-tungstenite)

pub mod api_client;
pub mod channel;

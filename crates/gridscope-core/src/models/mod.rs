//! 도메인 데이터 모델.
//!
//! 서버 와이어 포맷(JSON)과 1:1 대응하는 serde 구조체.

pub mod alert;
pub mod flows;
pub mod health;
pub mod maintenance;
pub mod suggestion;
pub mod telemetry;

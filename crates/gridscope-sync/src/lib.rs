//! # gridscope-sync
//!
//! 실시간 상태 동기화 코어.
//! 이벤트 채널에서 내려온 프레임을 디코드하고, 단일 상태 컨테이너에
//! 이벤트 종류별 병합 정책으로 반영하며, 운영자 액션(제안 수락/거절,
//! 경보 확인)의 confirm-then-commit 라이프사이클과 주기적 헬스 갱신을
//! 관리한다.
//!
//! ## 구조
//!
//! - [`decoder`] — 수신 프레임 → 타입드 이벤트
//! - [`store`] — 공유 상태 컨테이너 + 리듀서 (단일 쓰기 진입점)
//! - [`pipeline`] — 디코드→적용 순차 루프
//! - [`suggestion`] / [`alert`] — 낙관적 확인 라이프사이클
//! - [`health`] — 주기적 헬스 스냅샷 갱신
//! - [`service`] — 전체 구성 루트

pub mod alert;
pub mod decoder;
pub mod health;
pub mod pipeline;
pub mod service;
pub mod store;
pub mod suggestion;

#[cfg(test)]
pub(crate) mod testutil;

//! 공유 상태 컨테이너와 리듀서.
//!
//! 텔레메트리/경보/제안/헬스가 모이는 단일 가변 영역.
//! 쓰기는 이 모듈의 메서드로만 이루어진다 — 리듀서([`SiteStore::apply`])와
//! 라이프사이클 커밋 메서드가 전부이며, 병합 정책은 이벤트 종류별로 다르다:
//! 텔레메트리/제안은 현재 진실의 스냅샷이라 전체 교체, 경보는 이력 피드라
//! 최신순 누적. 이 비대칭은 도메인 규칙이므로 그대로 유지한다.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use gridscope_core::models::alert::{Alert, AlertStatus};
use gridscope_core::models::flows::{compute_current_flows, EnergyFlows};
use gridscope_core::models::health::HealthStatus;
use gridscope_core::models::suggestion::{RlSuggestion, SuggestionStatus};
use gridscope_core::models::telemetry::Telemetry;

use crate::decoder::SiteEvent;

/// 동기화 대상 사이트 상태 스냅샷
#[derive(Debug, Clone, Default)]
pub struct SiteState {
    /// 최신 텔레메트리 샘플 (슬롯 하나)
    pub latest_telemetry: Option<Telemetry>,
    /// 경보 피드 (최신이 맨 앞)
    pub alerts: Vec<Alert>,
    /// 현재 RL 제안 (슬롯 하나)
    pub suggestion: Option<RlSuggestion>,
    /// 최근 헬스 스냅샷
    pub health: Option<HealthStatus>,
}

/// 상태 컨테이너 — 단일 쓰기 진입점
///
/// 변경마다 리비전 카운터가 watch로 브로드캐스트되어
/// UI 소비자가 다시 읽을 시점을 알 수 있다.
pub struct SiteStore {
    state: RwLock<SiteState>,
    revision_tx: watch::Sender<u64>,
}

impl SiteStore {
    /// 빈 상태로 생성
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state: RwLock::new(SiteState::default()),
            revision_tx,
        }
    }

    /// Arc로 감싼 컨테이너 생성
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn bump_revision(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }

    /// 리비전 변경 수신기 생성
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// 현재 상태 스냅샷 복제
    pub fn snapshot(&self) -> SiteState {
        self.state.read().clone()
    }

    /// 리듀서 — 채널 이벤트를 종류별 병합 정책으로 반영
    pub fn apply(&self, event: SiteEvent) {
        {
            let mut state = self.state.write();
            match event {
                SiteEvent::TelemetryUpdate(sample) => {
                    debug!("텔레메트리 교체: {} @ {}", sample.device_id, sample.timestamp);
                    state.latest_telemetry = Some(sample);
                }
                SiteEvent::Alert(alert) => {
                    debug!("경보 수신: {} ({:?})", alert.id, alert.severity);
                    state.alerts.insert(0, alert);
                }
                SiteEvent::Suggestion(suggestion) => {
                    if let Some(previous) = &state.suggestion {
                        if previous.is_pending() {
                            warn!("미해결 제안 {} 교체됨 → {}", previous.id, suggestion.id);
                        }
                    }
                    state.suggestion = Some(suggestion);
                }
            }
        }
        self.bump_revision();
    }

    /// 경보 피드 초기 시딩 — 빈 피드일 때만 REST 조회 결과로 채운다
    pub fn seed_alerts(&self, alerts: Vec<Alert>) {
        {
            let mut state = self.state.write();
            if !state.alerts.is_empty() {
                debug!("경보 피드 이미 채워짐 — 시딩 생략");
                return;
            }
            state.alerts = alerts;
        }
        self.bump_revision();
    }

    /// 경보 확인 커밋 — id로 찾아 상태만 제자리 변경
    ///
    /// 피드에 없는 id는 상태 변화 없이 false를 반환한다.
    pub fn acknowledge_alert(&self, alert_id: &str) -> bool {
        let committed = {
            let mut state = self.state.write();
            match state.alerts.iter_mut().find(|a| a.id == alert_id) {
                Some(alert) => {
                    alert.status = AlertStatus::Acknowledged;
                    true
                }
                None => {
                    error!("확인할 경보 미발견: {alert_id}");
                    false
                }
            }
        };
        if committed {
            self.bump_revision();
        }
        committed
    }

    /// 제안 상태 커밋 — 현재 제안이 여전히 해당 id일 때만 반영
    ///
    /// 확인 호출이 진행되는 사이 제안이 교체됐으면 커밋하지 않는다.
    pub fn set_suggestion_status(&self, suggestion_id: &str, status: SuggestionStatus) -> bool {
        let committed = {
            let mut state = self.state.write();
            match &mut state.suggestion {
                Some(current) if current.id == suggestion_id => {
                    current.status = status;
                    true
                }
                _ => {
                    warn!("제안 {suggestion_id} 이미 교체됨 — 상태 커밋 생략");
                    false
                }
            }
        };
        if committed {
            self.bump_revision();
        }
        committed
    }

    /// 헬스 스냅샷 전체 교체
    pub fn replace_health(&self, health: HealthStatus) {
        self.state.write().health = Some(health);
        self.bump_revision();
    }

    /// 헬스 스냅샷 제거 (로그아웃 시)
    pub fn clear_health(&self) {
        self.state.write().health = None;
        self.bump_revision();
    }

    /// 디스패치 다이어그램용 흐름 쌍.
    ///
    /// 결정 대기 중인 제안이 있으면 계산기를 우회하고 제안이 가진
    /// current/suggested 흐름 쌍을 그대로 보여준다. 그 외에는 최신
    /// 텔레메트리와 헬스에서 계산한 스냅샷 하나만 반환한다.
    pub fn display_flows(&self) -> (EnergyFlows, Option<EnergyFlows>) {
        let state = self.state.read();
        match &state.suggestion {
            Some(suggestion) if suggestion.is_pending() => (
                suggestion.current_flows.clone(),
                Some(suggestion.suggested_flows.clone()),
            ),
            _ => (
                compute_current_flows(state.health.as_ref(), state.latest_telemetry.as_ref()),
                None,
            ),
        }
    }
}

impl Default for SiteStore {
    fn default() -> Self {
        Self::new()
    }
}

//! 동기화 서비스 구성 루트.
//!
//! 상태 컨테이너, 연결 드라이버, 파이프라인, 헬스 갱신, 라이프사이클을
//! 한 번에 조립한다. 호스트 앱은 이 타입 하나로 로그인/로그아웃과
//! 상태 구독, 운영자 액션을 모두 처리한다.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use gridscope_core::config::AppConfig;
use gridscope_core::error::CoreError;
use gridscope_core::ports::api_client::ApiClient;
use gridscope_core::ports::channel::EventChannel;
use gridscope_network::auth::SessionManager;
use gridscope_network::driver::{BackoffPolicy, ConnectionDriver, ConnectionStatus, DriverHandle};
use gridscope_network::http_client::HttpApiClient;
use gridscope_network::ws_channel::WsEventChannel;
use tokio::sync::watch;

use crate::alert::AlertLifecycle;
use crate::health::HealthRefresher;
use crate::pipeline::SyncPipeline;
use crate::store::SiteStore;
use crate::suggestion::SuggestionLifecycle;

/// 실시간 동기화 서비스
pub struct SyncService {
    session: Arc<SessionManager>,
    api: Arc<dyn ApiClient>,
    store: Arc<SiteStore>,
    driver: DriverHandle,
    pipeline: JoinHandle<()>,
    refresher: JoinHandle<()>,
    suggestions: SuggestionLifecycle,
    alerts: AlertLifecycle,
}

impl SyncService {
    /// 주입된 포트 구현으로 서비스 조립 및 백그라운드 태스크 시작
    pub fn start(
        config: &AppConfig,
        session: Arc<SessionManager>,
        api: Arc<dyn ApiClient>,
        channel: Arc<dyn EventChannel>,
    ) -> Self {
        let site_id = &config.server.site_id;
        let store = SiteStore::shared();

        let (raw_tx, raw_rx) = mpsc::channel(config.sync.channel_buffer);
        let backoff =
            BackoffPolicy::from_millis(config.sync.reconnect_base_ms, config.sync.reconnect_max_ms);
        let driver =
            ConnectionDriver::new(channel, raw_tx, session.subscribe(), backoff).spawn();
        let pipeline = SyncPipeline::new(store.clone()).spawn(raw_rx);
        let refresher = HealthRefresher::new(
            api.clone(),
            store.clone(),
            site_id,
            config.sync.health_refresh_interval(),
            session.subscribe(),
        )
        .spawn();

        let suggestions = SuggestionLifecycle::new(api.clone(), store.clone(), site_id);
        let alerts = AlertLifecycle::new(api.clone(), store.clone(), site_id);

        info!("동기화 서비스 시작: site={site_id}");

        Self {
            session,
            api,
            store,
            driver,
            pipeline,
            refresher,
            suggestions,
            alerts,
        }
    }

    /// 실서버용 조립 — HTTP 클라이언트와 WebSocket 채널을 설정에서 구성
    pub fn connect(config: &AppConfig) -> Result<Self, CoreError> {
        let session = Arc::new(SessionManager::new());
        let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(
            &config.server.api_base_url,
            session.clone(),
            Duration::from_secs(config.server.request_timeout_secs),
        )?);
        let channel: Arc<dyn EventChannel> = Arc::new(WsEventChannel::new(
            &config.server.ws_base_url,
            &config.server.site_id,
            session.clone(),
        ));
        Ok(Self::start(config, session, api, channel))
    }

    /// 로그인 — 토큰 획득 후 게이트를 열고 경보 피드를 시딩한다
    ///
    /// 시딩 실패는 치명적이지 않다. 피드는 이후 채널 이벤트로 채워진다.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), CoreError> {
        let resp = self.api.login(email, password).await?;
        self.session.login(resp.token);

        if let Err(e) = self.alerts.load_feed().await {
            warn!("경보 피드 초기 시딩 실패: {e}");
        }
        Ok(())
    }

    /// 로그아웃 — 게이트 폐쇄, 채널 해제와 헬스 정리는 태스크들이 수행
    pub fn logout(&self) {
        self.session.logout();
    }

    /// 상태 컨테이너
    pub fn store(&self) -> Arc<SiteStore> {
        self.store.clone()
    }

    /// 현재 연결 상태
    pub fn connection_status(&self) -> ConnectionStatus {
        self.driver.status()
    }

    /// 연결 상태 변경 수신기 생성
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.driver.subscribe()
    }

    /// 제안 라이프사이클
    pub fn suggestions(&self) -> &SuggestionLifecycle {
        &self.suggestions
    }

    /// 경보 라이프사이클
    pub fn alerts(&self) -> &AlertLifecycle {
        &self.alerts
    }

    /// 세션 관리자
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// 모든 백그라운드 태스크 강제 종료
    pub fn shutdown(&self) {
        self.driver.abort();
        self.pipeline.abort();
        self.refresher.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_alert, StubApi};
    use async_trait::async_trait;
    use gridscope_core::models::alert::AlertStatus;
    use gridscope_core::models::suggestion::SuggestionStatus;
    use gridscope_core::ports::channel::ChannelMessage;
    use parking_lot::Mutex;

    /// 열어둔 송신자를 테스트가 쥐고 있는 mock 채널
    struct HeldChannel {
        tx_slot: Mutex<Option<mpsc::Sender<ChannelMessage>>>,
    }

    impl HeldChannel {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                tx_slot: Mutex::new(None),
            })
        }

        fn sender(&self) -> mpsc::Sender<ChannelMessage> {
            self.tx_slot.lock().clone().expect("채널 미연결")
        }
    }

    #[async_trait]
    impl EventChannel for HeldChannel {
        async fn open(&self) -> Result<mpsc::Receiver<ChannelMessage>, CoreError> {
            let (tx, rx) = mpsc::channel(16);
            *self.tx_slot.lock() = Some(tx);
            Ok(rx)
        }
    }

    const TELEMETRY_FRAME: &str = r#"{
        "type": "telemetry_update",
        "payload": {
            "timestamp": "2026-08-30T09:00:00Z",
            "site_id": "site_123", "device_id": "inv_22", "subsystem": "inverter",
            "metrics": { "voltage": 415.2, "current": 12.1, "frequency": 50.01, "temp_c": 65.0 }
        }
    }"#;

    const SUGGESTION_FRAME: &str = r#"{
        "type": "rl_suggestion",
        "payload": {
            "id": "rl-1", "timestamp": "2026-08-30T09:10:00Z",
            "action_summary": "Discharge battery to meet load",
            "explanation": ["High grid prices are forecasted."],
            "confidence": 0.95, "estimated_cost_savings": 125.5, "status": "pending",
            "current_flows": {
                "grid_to_load": 150.0, "pv_to_load": 200.0, "pv_to_battery": 50.0,
                "battery_to_load": 0.0, "battery_to_grid": 0.0, "pv_to_grid": 10.0
            },
            "suggested_flows": {
                "grid_to_load": 20.0, "pv_to_load": 200.0, "pv_to_battery": 0.0,
                "battery_to_load": 130.0, "battery_to_grid": 0.0, "pv_to_grid": 10.0
            }
        }
    }"#;

    fn start_service(
        api: Arc<StubApi>,
        channel: Arc<HeldChannel>,
    ) -> (SyncService, Arc<SessionManager>) {
        let config = AppConfig::default_config();
        let session = Arc::new(SessionManager::new());
        let service = SyncService::start(&config, session.clone(), api, channel);
        (service, session)
    }

    #[tokio::test(start_paused = true)]
    async fn login_connects_syncs_and_logout_tears_down() {
        let api = StubApi::new();
        *api.alerts.lock() = vec![make_alert("alert-seeded")];
        let channel = HeldChannel::new();
        let (service, _session) = start_service(api.clone(), channel.clone());

        // 로그인 전: 게이트 폐쇄, 연결 없음
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.connection_status(), ConnectionStatus::Disconnected);

        service.login("operator@energy-ems.com", "pw").await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(service.connection_status(), ConnectionStatus::Connected);
        let state = service.store().snapshot();
        assert!(state.health.is_some());
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].id, "alert-seeded");

        // 채널 이벤트가 피드/슬롯에 반영된다
        let tx = channel.sender();
        tx.send(ChannelMessage::Text(TELEMETRY_FRAME.to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(service.store().snapshot().latest_telemetry.is_some());

        service.logout();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(service.connection_status(), ConnectionStatus::Disconnected);
        assert!(service.store().snapshot().health.is_none());

        service.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn pushed_suggestion_is_actionable_through_service() {
        let api = StubApi::new();
        let channel = HeldChannel::new();
        let (service, _session) = start_service(api.clone(), channel.clone());

        service.login("operator@energy-ems.com", "pw").await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        channel
            .sender()
            .send(ChannelMessage::Text(SUGGESTION_FRAME.to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        // pending 제안은 다이어그램 흐름 쌍을 직접 제공한다
        let (current, suggested) = service.store().display_flows();
        assert_eq!(current.grid_to_load, 150.0);
        assert_eq!(suggested.unwrap().battery_to_load, 130.0);

        let schedule = service.suggestions().accept("rl-1").await.unwrap();
        assert_eq!(schedule, "Action scheduled successfully.");
        assert_eq!(
            service.store().snapshot().suggestion.unwrap().status,
            SuggestionStatus::Accepted
        );

        service.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledged_alert_commits_through_service() {
        let api = StubApi::new();
        *api.alerts.lock() = vec![make_alert("alert-1")];
        let channel = HeldChannel::new();
        let (service, _session) = start_service(api.clone(), channel.clone());

        service.login("operator@energy-ems.com", "pw").await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        service.alerts().acknowledge("alert-1").await.unwrap();
        assert_eq!(
            service.store().snapshot().alerts[0].status,
            AlertStatus::Acknowledged
        );

        service.shutdown();
    }
}

//! 테스트 공용 stub과 픽스처.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gridscope_core::error::CoreError;
use gridscope_core::models::alert::{Alert, AlertSeverity, AlertStatus};
use gridscope_core::models::flows::EnergyFlows;
use gridscope_core::models::health::HealthStatus;
use gridscope_core::models::maintenance::MaintenanceAsset;
use gridscope_core::models::suggestion::{RlSuggestion, SuggestionStatus};
use gridscope_core::ports::api_client::{AcceptResponse, AckResponse, ApiClient, LoginResponse};

/// 설정 가능한 API stub — 호출 횟수 기록 + 실패/지연 주입
pub(crate) struct StubApi {
    /// 확인 호출(수락/거절/경보 확인) 실패 주입
    pub fail_confirmations: AtomicBool,
    /// 헬스 조회 실패 주입
    pub fail_health: AtomicBool,
    /// 확인 호출 지연 (밀리초, in-flight 가드 테스트용)
    pub confirm_delay_ms: AtomicU64,
    /// 반환할 헬스 스냅샷
    pub health: Mutex<HealthStatus>,
    /// 반환할 경보 목록
    pub alerts: Mutex<Vec<Alert>>,
    pub health_calls: AtomicUsize,
    pub accept_calls: AtomicUsize,
    pub reject_calls: AtomicUsize,
    pub ack_calls: AtomicUsize,
}

impl StubApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_confirmations: AtomicBool::new(false),
            fail_health: AtomicBool::new(false),
            confirm_delay_ms: AtomicU64::new(0),
            health: Mutex::new(make_health(150.7)),
            alerts: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
            accept_calls: AtomicUsize::new(0),
            reject_calls: AtomicUsize::new(0),
            ack_calls: AtomicUsize::new(0),
        })
    }

    async fn confirm(&self) -> Result<(), CoreError> {
        let delay = self.confirm_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_confirmations.load(Ordering::SeqCst) {
            Err(CoreError::Network("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ApiClient for StubApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, CoreError> {
        Ok(LoginResponse {
            token: "stub-jwt".to_string(),
        })
    }

    async fn fetch_health_status(&self, _site_id: &str) -> Result<HealthStatus, CoreError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_health.load(Ordering::SeqCst) {
            Err(CoreError::Network("timeout".to_string()))
        } else {
            Ok(self.health.lock().clone())
        }
    }

    async fn fetch_alerts(&self, _site_id: &str) -> Result<Vec<Alert>, CoreError> {
        Ok(self.alerts.lock().clone())
    }

    async fn acknowledge_alert(
        &self,
        _site_id: &str,
        _alert_id: &str,
    ) -> Result<AckResponse, CoreError> {
        self.ack_calls.fetch_add(1, Ordering::SeqCst);
        self.confirm().await?;
        Ok(AckResponse { success: true })
    }

    async fn accept_suggestion(
        &self,
        _site_id: &str,
        _suggestion_id: &str,
    ) -> Result<AcceptResponse, CoreError> {
        self.accept_calls.fetch_add(1, Ordering::SeqCst);
        self.confirm().await?;
        Ok(AcceptResponse {
            success: true,
            schedule: "Action scheduled successfully.".to_string(),
        })
    }

    async fn reject_suggestion(
        &self,
        _site_id: &str,
        _suggestion_id: &str,
    ) -> Result<AckResponse, CoreError> {
        self.reject_calls.fetch_add(1, Ordering::SeqCst);
        self.confirm().await?;
        Ok(AckResponse { success: true })
    }

    async fn fetch_maintenance_assets(
        &self,
        _site_id: &str,
    ) -> Result<Vec<MaintenanceAsset>, CoreError> {
        Ok(vec![MaintenanceAsset {
            id: "asset-1".to_string(),
            name: "Motor 1".to_string(),
            asset_type: "Motor".to_string(),
            failure_probability: 0.85,
            rank: 1,
        }])
    }

    async fn schedule_maintenance(
        &self,
        _site_id: &str,
        _asset_id: &str,
    ) -> Result<AckResponse, CoreError> {
        self.confirm().await?;
        Ok(AckResponse { success: true })
    }
}

pub(crate) fn make_health(grid_draw: f64) -> HealthStatus {
    HealthStatus {
        site_health: 92.5,
        grid_draw,
        battery_soc: 78.2,
        pv_generation_today: 450.3,
        battery_soh: 98.1,
        inverter_health: 95.0,
        motor_health: 89.0,
        pv_health: 97.2,
        ev_charger_health: 99.5,
    }
}

pub(crate) fn make_alert(id: &str) -> Alert {
    Alert {
        id: id.to_string(),
        timestamp: Utc::now(),
        device_id: "inv_22".to_string(),
        severity: AlertSeverity::Critical,
        message: "Inverter temperature exceeds threshold".to_string(),
        diagnosis: "Cooling fan failure detected.".to_string(),
        recommended_action: "Dispatch technician.".to_string(),
        status: AlertStatus::Active,
    }
}

pub(crate) fn make_suggestion(id: &str) -> RlSuggestion {
    RlSuggestion {
        id: id.to_string(),
        timestamp: Utc::now(),
        action_summary: "Discharge battery to meet load".to_string(),
        explanation: vec!["High grid prices are forecasted.".to_string()],
        confidence: 0.95,
        estimated_cost_savings: 125.5,
        status: SuggestionStatus::Pending,
        current_flows: EnergyFlows::default(),
        suggested_flows: EnergyFlows {
            battery_to_load: 130.0,
            ..EnergyFlows::default()
        },
    }
}

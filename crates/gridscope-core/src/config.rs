//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 사이트 ID, 재연결/헬스 갱신 주기 등 런타임 설정을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 실시간 동기화 설정
    #[serde(default)]
    pub sync: SyncConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// REST API 기본 URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// WebSocket 기본 URL
    #[serde(default = "default_ws_base_url")]
    pub ws_base_url: String,
    /// 모니터링 대상 사이트 ID
    #[serde(default = "default_site_id")]
    pub site_id: String,
    /// HTTP 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ws_base_url: default_ws_base_url(),
            site_id: default_site_id(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// 실시간 동기화 설정 — 재연결 backoff, 헬스 갱신 주기
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 재연결 backoff 기본 지연 (밀리초)
    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,
    /// 재연결 backoff 최대 지연 (밀리초)
    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,
    /// 헬스 상태 갱신 주기 (초)
    #[serde(default = "default_health_refresh_secs")]
    pub health_refresh_secs: u64,
    /// 수신 메시지 채널 버퍼 크기
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconnect_base_ms: default_reconnect_base_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
            health_refresh_secs: default_health_refresh_secs(),
            channel_buffer: default_channel_buffer(),
        }
    }
}

impl SyncConfig {
    /// 헬스 갱신 주기를 Duration으로 반환
    pub fn health_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.health_refresh_secs)
    }
}

fn default_api_base_url() -> String {
    "https://api.energy-ems.com/api/v1".to_string()
}

fn default_ws_base_url() -> String {
    "wss://api.energy-ems.com".to_string()
}

fn default_site_id() -> String {
    "site_123".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_reconnect_base_ms() -> u64 {
    1_000
}

fn default_reconnect_max_ms() -> u64 {
    30_000
}

fn default_health_refresh_secs() -> u64 {
    60
}

fn default_channel_buffer() -> usize {
    64
}

impl AppConfig {
    /// 기본값으로 채운 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            sync: SyncConfig::default(),
        }
    }

    /// 설정 파일(선택) + `GRIDSCOPE_` 환경변수에서 로드
    ///
    /// 파일이 없으면 기본값 위에 환경변수만 적용된다.
    pub fn load(config_path: Option<&str>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GRIDSCOPE")
                .separator("__")
                .try_parsing(true),
        );

        let loaded = builder
            .build()
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

        loaded
            .try_deserialize()
            .map_err(|e| CoreError::Config(format!("설정 역직렬화 실패: {e}")))
    }
}

//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 에디터 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `GRADLY_API_BASE_URL`: Gradly REST API 기본 주소 (필수)
//! - `GRADLY_API_TOKEN`: 인증 토큰 (선택: 있으면 `Authorization: Bearer` 헤더로 전송)
//! - `AUTOSAVE_INTERVAL_SECS`: 자동 저장 주기(초), 기본값 15
//! - `HTTP_TIMEOUT_SECS`: HTTP 요청 타임아웃(초), 기본값 30

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// 자동 저장 주기 기본값 (초)
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 15;
/// HTTP 타임아웃 기본값 (초)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 에디터 전체 설정을 담는 구조체
///
/// 시작 시 환경변수에서 한 번 읽어온 후 게이트웨이와 세션 생성에 사용됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// API 기본 주소 (예: "https://api.gradly.app/api"), 끝의 `/`는 제거됨
    pub api_base_url: String,
    /// Bearer 토큰: None이면 인증 헤더를 보내지 않음
    pub api_token: Option<String>,
    /// 자동 저장 타이머 주기
    pub autosave_interval: Duration,
    /// HTTP 클라이언트 타임아웃
    pub http_timeout: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// - `GRADLY_API_BASE_URL`이 없으면 `ConfigError::Missing`
    /// - 자동 저장 주기가 0이면 `ConfigError::Invalid`
    ///
    /// 숫자 파싱에 실패한 값은 기본값으로 대체됩니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = env::var("GRADLY_API_BASE_URL").map_err(|source| {
            ConfigError::Missing {
                name: "GRADLY_API_BASE_URL",
                source,
            }
        })?;

        // 빈 문자열 토큰은 "토큰 없음"으로 취급합니다.
        let api_token = env::var("GRADLY_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let autosave_secs = parse_secs("AUTOSAVE_INTERVAL_SECS", DEFAULT_AUTOSAVE_INTERVAL_SECS);
        let timeout_secs = parse_secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS);

        Self::new(api_base_url, api_token, autosave_secs, timeout_secs)
    }

    /// 값을 직접 지정하여 설정을 만듭니다. (`from_env`와 테스트에서 사용)
    pub fn new(
        api_base_url: impl Into<String>,
        api_token: Option<String>,
        autosave_secs: u64,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                name: "GRADLY_API_BASE_URL",
                reason: "must not be empty".to_string(),
            });
        }
        if autosave_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "AUTOSAVE_INTERVAL_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            api_token,
            autosave_interval: Duration::from_secs(autosave_secs),
            http_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

// 파싱 실패 시 기본값을 사용합니다. (서버 포트 설정과 같은 방식)
fn parse_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::new("http://localhost:4000/api/", None, 15, 30).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert_eq!(config.autosave_interval, Duration::from_secs(15));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Config::new("http://localhost", None, 0, 30).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "AUTOSAVE_INTERVAL_SECS", .. }));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(Config::new("/", None, 15, 30).is_err());
    }
}

//! # 에러 처리 모듈
//!
//! 자동 저장 세션에서 발생할 수 있는 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 에러는 발생 지점에 따라 나뉩니다:
//! - `LookupError`: 챕터를 열 때(조회) 발생: 세션을 시작할 수 없음
//! - `SaveError`: 챕터를 저장할 때 발생: 로컬 내용은 그대로 유지되고 상태만 `Error`로 바뀜
//! - `SessionError`: 세션 컨트롤러의 공개 API에서 호출자에게 전달되는 에러
//! - `ConfigError`: 환경변수 설정 오류

use thiserror::Error;

/// 챕터 조회(open) 단계의 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// 요청한 챕터가 존재하지 않음
    #[error("Chapter not found: {0}")]
    NotFound(String),

    /// 네트워크 오류 (일시적: 다시 시도해도 안전)
    #[error("Network error: {0}")]
    Network(String),
}

/// 챕터 저장 단계의 에러
///
/// 게이트웨이는 자체적으로 재시도하지 않습니다.
/// 재시도 여부는 스케줄러(다음 타이머 틱)나 사용자(명시적 저장)가 결정합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// 네트워크 오류 (연결 실패, 타임아웃 등)
    #[error("Network error: {0}")]
    Network(String),

    /// 서버가 수정 요청을 거부함 (HTTP 4xx/5xx 또는 status != "success")
    #[error("Server rejected the update: {0}")]
    ServerRejected(String),

    /// 분류할 수 없는 에러 (응답 파싱 실패 등)
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SaveError {
    /// 다시 시도해도 상태가 망가지지 않는 일시적 에러인지 여부
    pub fn is_transient(&self) -> bool {
        matches!(self, SaveError::Network(_))
    }

    /// 사용자에게 보여줄 메시지
    ///
    /// `Unknown`은 UI에서 `ServerRejected`와 동일하게 취급합니다.
    pub fn user_message(&self) -> String {
        match self {
            SaveError::Network(_) => "Network error. Your changes are kept locally.".to_string(),
            SaveError::ServerRejected(ref msg) if !msg.is_empty() => msg.clone(),
            SaveError::ServerRejected(_) | SaveError::Unknown(_) => {
                "Failed to update chapter.".to_string()
            }
        }
    }
}

/// 세션 컨트롤러가 호출자에게 반환하는 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 챕터 로딩 실패: 세션 초기화가 중단됨
    /// #[from]: LookupError → SessionError::Load 자동 변환 (`?` 사용 가능)
    #[error("Failed to load chapter: {0}")]
    Load(#[from] LookupError),

    /// 열린 문서가 없는 상태에서 편집을 시도함
    #[error("No chapter is open")]
    NotOpen,

    /// 조회가 끝나기 전에 다른 `open`이 시작되어 이 요청의 결과를 버림
    #[error("Superseded by a newer open request")]
    Superseded,
}

/// 설정 로딩 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수가 없음
    #[error("Missing environment variable {name}: {source}")]
    Missing {
        name: &'static str,
        #[source]
        source: std::env::VarError,
    },

    /// 값은 있지만 사용할 수 없음
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// reqwest 에러를 저장 에러 분류 체계로 변환합니다.
// `?` 연산자로 HTTP 호출 결과를 바로 전파할 수 있게 해줍니다.
impl From<reqwest::Error> for SaveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            SaveError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            SaveError::ServerRejected(format!("HTTP {}", status))
        } else {
            SaveError::Unknown(err.to_string())
        }
    }
}

// 조회 단계에는 NotFound/Network 두 가지만 존재합니다.
// 응답 파싱 실패 같은 나머지 경우도 "챕터를 가져오지 못함"으로 보고 Network로 분류합니다.
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

//! # Gradly 챕터 에디터: 자동 저장 세션
//!
//! 챕터의 마크다운 내용을 불러와 로컬 편집을 마지막 저장본과 비교하고,
//! 주기적 자동 저장 / 명시적 저장 / 단축키 저장으로 Gradly REST API에 영속화합니다.
//!
//! ## 모듈 구성
//! - `config`: 환경변수 설정
//! - `error`: 에러 타입 (조회/저장/세션/설정)
//! - `models`: 챕터 엔티티, 저장 상태
//! - `services`: 텍스트 통계, 사용자 알림
//! - `gateway`: 외부 API 추상화와 HTTP 구현
//! - `editor`: 콘텐츠 저장소, 변경 추적기, 스케줄러, 세션 컨트롤러
//!
//! ## 사용 예
//! ```no_run
//! use gradly_editor::{Config, HttpGateway, Session, SessionOptions};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let session = Session::new(HttpGateway::new(&config)?, SessionOptions::from(&config));
//! session.open("chapter-id").await?;
//! session.edit("# Limits\n\nε-δ definition")?;
//! session.save(true).await;
//! session.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;

pub use config::Config;
pub use editor::{KeyHandling, KeyPress, Session, SessionOptions};
pub use error::{ConfigError, LookupError, SaveError, SessionError};
pub use gateway::{
    ChapterGateway, ChapterLookup, ChapterUpdate, HttpGateway, Notifying, PersistOptions,
    PersistRequest,
};
pub use models::{Chapter, SaveOutcome, SaveStatus, SaveTrigger, SessionSnapshot, SkipReason};

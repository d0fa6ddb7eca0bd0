//! # 챕터 편집 & 자동 저장 세션
//!
//! 각 하위 모듈:
//! - `store`: 편집 중인 내용과 마지막 저장 내용 (Content Store)
//! - `tracker`: 저장 상태 계산 (Dirty-State Tracker)
//! - `scheduler`: 진행 중 저장 관리와 자동 저장 타이머 (Autosave Scheduler)
//! - `shortcut`: Ctrl/Cmd + S 단축키 판별
//! - `session`: 위 구성요소를 묶는 공개 API (Session Controller)

pub mod scheduler;
pub mod session;
pub mod shortcut;
pub mod store;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use session::{Session, SessionOptions};
pub use shortcut::{KeyHandling, KeyPress};

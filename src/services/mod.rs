//! # 서비스 모듈
//!
//! - `markdown`: 단어 수/문자 수/미리보기 계산
//! - `notify`: 사용자 알림 (토스트) 전달

pub mod markdown;
pub mod notify;

pub use markdown::*;
pub use notify::*;

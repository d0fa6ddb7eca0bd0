//! # 데이터 모델 모듈
//!
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `chapter`: Gradly API의 챕터/자료 엔티티와 응답 envelope
//! - `status`: 저장 상태, 저장 계기, 저장 결과, 화면 표시용 스냅샷
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Chapter`처럼 짧게 접근할 수 있습니다.

pub mod chapter;
pub mod status;

pub use chapter::*;
pub use status::*;

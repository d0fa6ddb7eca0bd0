//! # 저장 단축키 (Ctrl+S / Cmd+S)
//!
//! 키 입력 한 건을 받아 저장 단축키인지 판별합니다.
//!
//! ## 판별 규칙
//! - 수정자: Ctrl(Windows/Linux) 또는 Meta(macOS의 Cmd) 중 하나
//! - 키: 소문자 `"s"` (Shift/Alt는 보지 않음)
//!
//! 단축키로 판별되면 세션이 명시적 저장을 실행하고 `KeyHandling::Suppressed`를 반환합니다.
//! 호출 측(UI)은 `prevents_default()`가 true면 플랫폼 기본 동작을 막아야 합니다.

use crate::models::SaveOutcome;

/// 키 입력 한 건
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    /// macOS의 Cmd 키
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

// 빌더 패턴: `KeyPress::new("s").with_ctrl()`처럼 self를 받아 수정한 뒤 다시 반환합니다.
impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl 또는 Cmd와 함께 눌린 소문자 "s"
    pub fn is_save_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.key == "s"
    }
}

/// 키 입력 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyHandling {
    /// 저장 단축키였음: 플랫폼 기본 동작(브라우저의 "페이지 저장" 등)을 막아야 함
    Suppressed(SaveOutcome),
    /// 에디터가 처리하지 않는 키
    PassThrough,
}

impl KeyHandling {
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyHandling::Suppressed(_))
    }
}

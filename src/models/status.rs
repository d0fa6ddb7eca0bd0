//! # 저장 상태 모델 정의
//!
//! 자동 저장 세션이 외부(UI, 터미널 드라이버)에 보여주는 상태 타입들입니다.
//!
//! ## 상태 흐름
//! ```text
//! [편집] Idle ──저장 시작──▶ Saving ──성공──▶ Saved
//!                              └────실패──▶ Error ──다음 편집/성공──▶ Idle | Saved
//! ```

use crate::error::SaveError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 저장 상태: 직접 설정할 수 없고 항상 세션 상태로부터 계산됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// 열린 문서가 없거나, 저장되지 않은 변경이 있음 (저장 중은 아님)
    Idle,
    /// 저장 요청이 진행 중
    Saving,
    /// 현재 내용이 마지막으로 저장된 내용과 같음
    Saved,
    /// 마지막 저장 시도가 실패함 (다음 편집 또는 성공한 저장까지 유지)
    Error,
}

/// 저장을 시작한 계기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTrigger {
    /// 주기적 자동 저장: 성공 시 알림 없음(silent)
    Timer,
    /// 사용자가 저장 명령을 실행함
    Explicit,
    /// 키보드 단축키 (Ctrl/Cmd + S): 명시적 저장과 동일하게 동작
    Shortcut,
}

impl SaveTrigger {
    /// 성공 알림을 생략해야 하는지 여부
    pub fn is_silent(self) -> bool {
        matches!(self, SaveTrigger::Timer)
    }
}

/// 저장을 건너뛴 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 이미 저장 요청이 진행 중 (요청 병합)
    InFlight,
    /// 변경 사항이 없음 (타이머 경로에서만 발생)
    Clean,
    /// 열린 문서가 없음
    NotOpen,
}

/// `save()` 호출 한 번의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 저장 성공: 마지막 저장 내용이 갱신됨
    Saved,
    /// 게이트웨이를 호출하지 않음
    Skipped(SkipReason),
    /// 게이트웨이가 실패를 보고함: 로컬 내용은 그대로 유지
    Failed(SaveError),
    /// 요청이 끝났지만 그 사이 다른 문서로 전환되어 결과를 버림
    Discarded,
}

/// 화면 표시용 세션 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub document_id: Option<String>,
    pub title: Option<String>,
    pub status: SaveStatus,
    pub content: String,
    /// 목록/상태 표시줄용 내용 미리보기 (앞부분 일부)
    pub excerpt: String,
    pub dirty: bool,
    pub word_count: usize,
    pub char_count: usize,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

//! # 변경 상태 추적기 (Dirty-State Tracker)
//!
//! 콘텐츠 저장소와 최근 저장 결과로부터 `SaveStatus`를 계산합니다.
//!
//! ## 우선순위
//! ```text
//! 열린 문서 없음        → Idle
//! 저장 진행 중          → Saving
//! 마지막 시도 실패      → Error   (다음 편집 또는 저장 성공 시 해제)
//! content != 저장본     → Idle    ("저장 안 된 변경 있음")
//! content == 저장본     → Saved
//! ```

use crate::editor::store::ContentStore;
use crate::error::SaveError;
use crate::models::SaveStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct DirtyTracker {
    failure: Option<SaveError>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 문서를 열 때 이전 문서의 결과를 지웁니다.
    pub fn reset(&mut self) {
        self.failure = None;
        self.last_saved_at = None;
    }

    /// 편집이 들어오면 변경 상태를 다시 평가하므로 실패 표시를 해제합니다.
    pub fn record_edit(&mut self) {
        self.failure = None;
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.failure = None;
        self.last_saved_at = Some(at);
    }

    pub fn record_failure(&mut self, err: SaveError) {
        self.failure = Some(err);
    }

    pub fn failure(&self) -> Option<&SaveError> {
        self.failure.as_ref()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn status(&self, store: &ContentStore, saving: bool) -> SaveStatus {
        if store.document().is_none() {
            SaveStatus::Idle
        } else if saving {
            SaveStatus::Saving
        } else if self.failure.is_some() {
            SaveStatus::Error
        } else if store.is_dirty() {
            SaveStatus::Idle
        } else {
            SaveStatus::Saved
        }
    }
}

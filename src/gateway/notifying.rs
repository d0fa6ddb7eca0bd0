//! # 알림 게이트웨이 데코레이터
//!
//! 다른 게이트웨이를 감싸서 저장 결과를 사용자 알림(토스트)으로 보냅니다.
//!
//! ## 알림 규칙
//! | 결과 | `silent = false` | `silent = true` (타이머 저장) |
//! |------|------------------|-------------------------------|
//! | 성공 | 성공 알림 | 알림 없음 |
//! | 실패 | 에러 알림 | 에러 알림 |
//!
//! ## 데코레이터 패턴
//! `Notifying<G>`도 `ChapterLookup + ChapterUpdate`를 구현하므로
//! 세션 입장에서는 일반 게이트웨이와 구분되지 않습니다.
//! 제네릭 `G`로 감싸기 때문에 동적 디스패치 없이 내부 게이트웨이를 호출합니다.
//!
//! 이 계층은 세션의 `open` 세대를 알지 못합니다.
//! 다른 챕터로 전환한 뒤 끝난 이전 챕터의 저장도 자신의 결과를 그대로 알립니다.

use crate::error::{LookupError, SaveError};
use crate::gateway::{ChapterLookup, ChapterUpdate, PersistOptions, PersistRequest};
use crate::models::Chapter;
use crate::services::{Notice, Notifier, TracingNotifier};
use std::sync::Arc;

pub const SAVE_SUCCESS_MESSAGE: &str = "Chapter updated successfully.";

/// 저장 결과를 사용자 알림으로 보내는 게이트웨이 데코레이터
pub struct Notifying<G> {
    inner: G,
    // Arc<dyn Notifier>: 알리미 구현(채널, 로그 등)을 실행 시점에 고를 수 있습니다.
    notifier: Arc<dyn Notifier>,
}

impl<G> Notifying<G> {
    pub fn new(inner: G, notifier: Arc<dyn Notifier>) -> Self {
        Self { inner, notifier }
    }

    /// 알림을 tracing 로그로만 남기는 기본 구성
    pub fn tracing(inner: G) -> Self {
        Self::new(inner, Arc::new(TracingNotifier))
    }
}

impl<G: ChapterLookup> ChapterLookup for Notifying<G> {
    async fn fetch_chapter(&self, document_id: &str) -> Result<Chapter, LookupError> {
        self.inner.fetch_chapter(document_id).await
    }
}

impl<G: ChapterUpdate> ChapterUpdate for Notifying<G> {
    async fn persist_chapter_content(
        &self,
        request: &PersistRequest,
        options: PersistOptions,
    ) -> Result<(), SaveError> {
        let result = self.inner.persist_chapter_content(request, options).await;
        match result {
            Ok(()) if !options.silent => self.notifier.notify(Notice::success(SAVE_SUCCESS_MESSAGE)),
            Ok(()) => {}
            // ref: result를 이동시키지 않고 에러를 빌려서 메시지만 만듭니다.
            Err(ref err) => self.notifier.notify(Notice::error(err.user_message())),
        }
        result
    }
}

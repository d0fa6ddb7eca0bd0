//! # 영속화 게이트웨이 (Persistence Gateway)
//!
//! 세션 코어가 외부 Gradly API와 상호작용하는 두 가지 능력을 트레이트로 정의합니다.
//! 세션은 HTTP 클라이언트나 JSON 형식을 알지 못하고 이 트레이트만 사용합니다.
//!
//! - `ChapterLookup`: 챕터 내용 조회 (`open` 시 호출)
//! - `ChapterUpdate`: 챕터 내용 저장 (자동/명시적 저장 시 호출)
//!
//! 하위 모듈:
//! - `http`: reqwest 기반 실제 구현
//! - `notifying`: 저장 결과를 사용자 알림으로 전달하는 데코레이터 (silent 모드 지원)
//!
//! 게이트웨이는 콘텐츠 저장소를 직접 수정하지 않습니다.
//! 성공 여부만 반환하고, `mark_persisted` 호출은 세션이 담당합니다.

pub mod http;
pub mod notifying;

pub use http::HttpGateway;
pub use notifying::Notifying;

use crate::error::{LookupError, SaveError};
use crate::models::{Chapter, SaveTrigger};
use std::future::Future;
use uuid::Uuid;

/// 저장 요청: 저장이 시작된 순간의 내용 스냅샷
///
/// 생성된 뒤에는 변경되지 않습니다. 저장 도중 들어온 편집은 다음 요청에 반영됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistRequest {
    /// 요청 식별자 (UUIDv7: 시간순 정렬 가능)
    pub request_id: Uuid,
    /// 저장 대상 문서(챕터) ID
    pub document_id: String,
    /// 요청을 만든 `open` 세대: 완료 시 현재 세대와 비교해 오래된 결과를 버림
    pub generation: Uuid,
    /// 저장할 내용 스냅샷
    pub content: String,
    pub trigger: SaveTrigger,
}

/// 게이트웨이 호출 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistOptions {
    /// true면 성공 시 사용자 알림을 보내지 않음 (주기적 자동 저장)
    pub silent: bool,
}

/// 챕터 조회 능력
pub trait ChapterLookup: Send + Sync {
    /// 챕터를 가져옵니다. 없으면 `LookupError::NotFound`.
    fn fetch_chapter(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<Chapter, LookupError>> + Send;
}

/// 챕터 내용 저장 능력
///
/// 실패는 `Network`/`ServerRejected`/`Unknown`으로 분류되며, 구현체는 재시도하지 않습니다.
pub trait ChapterUpdate: Send + Sync {
    fn persist_chapter_content(
        &self,
        request: &PersistRequest,
        options: PersistOptions,
    ) -> impl Future<Output = Result<(), SaveError>> + Send;
}

/// 조회와 저장을 모두 제공하는 게이트웨이
pub trait ChapterGateway: ChapterLookup + ChapterUpdate + 'static {}

impl<T> ChapterGateway for T where T: ChapterLookup + ChapterUpdate + 'static {}

// Arc로 감싼 게이트웨이도 그대로 사용할 수 있게 합니다.
// (여러 세션이나 테스트 코드가 같은 게이트웨이를 공유할 때)
impl<G: ChapterLookup> ChapterLookup for std::sync::Arc<G> {
    fn fetch_chapter(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<Chapter, LookupError>> + Send {
        (**self).fetch_chapter(document_id)
    }
}

impl<G: ChapterUpdate> ChapterUpdate for std::sync::Arc<G> {
    fn persist_chapter_content(
        &self,
        request: &PersistRequest,
        options: PersistOptions,
    ) -> impl Future<Output = Result<(), SaveError>> + Send {
        (**self).persist_chapter_content(request, options)
    }
}

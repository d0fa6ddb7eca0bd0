//! # 테스트용 인메모리 게이트웨이
//!
//! 실제 HTTP 대신 메모리의 챕터 목록으로 조회하고, 저장 호출을 기록합니다.
//!
//! ## 제공 기능
//! - `push_result()`: 다음 저장의 결과를 미리 지정 (기본은 성공)
//! - `hold_saves()` / `release()`: 세마포어로 저장 완료 시점을 테스트가 조절
//! - `requests()` / `options()`: 게이트웨이에 도달한 요청 기록
//! - `completed_count()` / `max_concurrent()`: 끝까지 실행된 저장 수와 최대 동시 실행 수
//!
//! `Semaphore`의 허가(permit)가 0개로 시작하므로 `release()` 전에는 `acquire()`가 대기합니다.

use crate::error::{LookupError, SaveError};
use crate::gateway::{ChapterLookup, ChapterUpdate, PersistOptions, PersistRequest};
use crate::models::Chapter;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub(crate) fn chapter(id: &str, content: &str) -> Chapter {
    Chapter {
        id: id.to_string(),
        title: format!("Chapter {}", id),
        subject_id: "subject-1".to_string(),
        description: None,
        materials: Vec::new(),
        markdown_content: Some(content.to_string()),
        current_progress: 0.0,
        is_completed: false,
        completion_date: None,
    }
}

/// 호출을 기록하고, 결과와 완료 시점을 테스트가 조절할 수 있는 게이트웨이
pub(crate) struct FakeGateway {
    chapters: Mutex<HashMap<String, Chapter>>,
    calls: Mutex<Vec<(PersistRequest, PersistOptions)>>,
    results: Mutex<VecDeque<Result<(), SaveError>>>,
    hold: AtomicBool,
    gate: Semaphore,
    // 현재 실행 중 / 최대 동시 실행 / 완료된 저장 수
    active: AtomicUsize,
    max_active: AtomicUsize,
    completed: AtomicUsize,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            chapters: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            hold: AtomicBool::new(false),
            gate: Semaphore::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }
}

impl FakeGateway {
    pub fn with_chapters(chapters: &[(&str, &str)]) -> Self {
        let gateway = Self::default();
        {
            let mut map = gateway.chapters.lock().unwrap();
            for (id, content) in chapters {
                map.insert(id.to_string(), chapter(id, content));
            }
        }
        gateway
    }

    /// 다음 저장 호출의 결과를 지정합니다. (지정하지 않으면 성공)
    pub fn push_result(&self, result: Result<(), SaveError>) {
        self.results.lock().unwrap().push_back(result);
    }

    /// 이후 저장 호출은 `release()`될 때까지 완료되지 않습니다.
    pub fn hold_saves(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// 대기 중인 저장 하나를 완료시킵니다.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn requests(&self) -> Vec<PersistRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub fn options(&self) -> Vec<PersistOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| *o).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 게이트를 통과해 결과를 돌려준 저장 수
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// 동시에 진행된 저장 호출의 최대 개수
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl ChapterLookup for FakeGateway {
    async fn fetch_chapter(&self, document_id: &str) -> Result<Chapter, LookupError> {
        self.chapters
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(document_id.to_string()))
    }
}

impl ChapterUpdate for FakeGateway {
    async fn persist_chapter_content(
        &self,
        request: &PersistRequest,
        options: PersistOptions,
    ) -> Result<(), SaveError> {
        self.calls.lock().unwrap().push((request.clone(), options));
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if self.hold.load(Ordering::SeqCst) {
            self.gate.acquire().await.expect("gate closed").forget();
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// 다른 태스크가 게이트웨이에 도달할 때까지 양보합니다.
pub(crate) async fn wait_for_calls(gateway: &FakeGateway, count: usize) {
    for _ in 0..1000 {
        if gateway.call_count() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {} gateway calls, saw {}", count, gateway.call_count());
}

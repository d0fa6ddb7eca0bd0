//! # 편집 세션 컨트롤러 (Session Controller)
//!
//! 문서 ID 하나를 콘텐츠 저장소, 변경 추적기, 게이트웨이, 스케줄러와 묶는 공개 API입니다.
//! 전역 싱글턴 대신 `Session::new()`로 명시적으로 생성하고 게이트웨이를 주입받습니다.
//!
//! ## 세션 사용 흐름
//! ```text
//! 1. session.open("chapter-id")   → 챕터 조회 + 로딩 + 자동 저장 타이머 시작
//! 2. session.edit(text)           → 편집 내용 반영 (동기)
//! 3. session.save(true)           → 명시적 저장 (또는 Ctrl+S → handle_key)
//! 4. session.flush()              → 진행 중인 저장을 기다린 뒤 남은 변경을 저장 (종료 직전)
//! 5. session.close()              → 타이머 취소 (진행 중인 저장은 기다리지도, 취소하지도 않음)
//! ```
//!
//! ## 동시성
//! 상태는 `std::sync::Mutex` 하나로 보호하고, 잠금은 절대 `.await`를 넘어 유지하지 않습니다.
//! 저장 요청에는 문서 ID와 `open` 세대(UUIDv7)가 붙어 있어서,
//! 완료 시점에 세션이 다른 문서로 전환되었으면 결과를 버립니다.
//!
//! ## 타이머 저장과 close()
//! 타이머는 저장을 별도 태스크(`tokio::spawn`)로 띄우고 그 완료를 기다립니다.
//! `close()`/`open()`이 타이머 태스크를 중단(abort)해도 이미 시작된 PUT은 끝까지 실행되고,
//! 명시적 저장과 같은 방식으로 결과가 버려집니다.
//!
//! ## Notify 두 개
//! - `restart`: 현재 세대의 저장이 끝나면 자동 저장 주기를 처음부터 다시 셈
//! - `settled`: 세대와 무관하게 어떤 저장이든 끝나면 알림 (`wait_for_save()`가 사용)

use crate::config::{Config, DEFAULT_AUTOSAVE_INTERVAL_SECS};
use crate::editor::scheduler::{AutosaveTimer, ScheduleState};
use crate::editor::shortcut::{KeyHandling, KeyPress};
use crate::editor::store::ContentStore;
use crate::editor::tracker::DirtyTracker;
use crate::error::{SaveError, SessionError};
use crate::gateway::{ChapterGateway, PersistOptions, PersistRequest};
use crate::models::{SaveOutcome, SaveStatus, SaveTrigger, SessionSnapshot, SkipReason};
use crate::services;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

/// 스냅샷 미리보기 길이 (문자 수)
const EXCERPT_CHARS: usize = 120;

/// 세션 생성 옵션
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 자동 저장 타이머 주기 (기본 15초)
    pub autosave_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autosave_interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
        }
    }
}

// From 트레이트: `SessionOptions::from(&config)` 또는 `(&config).into()`로 변환합니다.
impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            autosave_interval: config.autosave_interval,
        }
    }
}

/// 잠금 안에서만 접근하는 세션 상태
#[derive(Default)]
struct SessionState {
    store: ContentStore,
    tracker: DirtyTracker,
    /// 진행 중인 저장 목록 (문서 ID 기준, `reset()`에서도 유지)
    schedule: ScheduleState,
    /// 현재 `open`의 세대: None이면 열린(또는 여는 중인) 문서 없음
    generation: Option<Uuid>,
    timer: Option<AutosaveTimer>,
}

impl SessionState {
    // 이전 문서의 타이머와 편집 상태를 버립니다.
    // 진행 중인 저장 목록(schedule)은 그대로 두어, 이전 PUT이 끝날 때까지 같은 문서의 새 저장을 막습니다.
    fn reset(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.store.unload();
        self.tracker.reset();
        self.generation = None;
    }

    /// 열린 문서의 저장이 진행 중인지 (이전 세대의 같은 문서 저장 포함)
    fn saving_current(&self) -> bool {
        self.store
            .document()
            .is_some_and(|doc| self.schedule.is_in_flight(&doc.id))
    }

    fn status(&self) -> SaveStatus {
        self.tracker.status(&self.store, self.saving_current())
    }

    /// 저장 결과를 반영합니다.
    ///
    /// 진행 중 표시는 세대와 관계없이 항상 해제합니다.
    /// 세대가 바뀌었으면 나머지 상태는 건드리지 않고 `Discarded`를 반환합니다.
    fn complete(&mut self, request: &PersistRequest, result: Result<(), SaveError>) -> SaveOutcome {
        self.schedule
            .finish(&request.document_id, request.request_id);

        if self.generation != Some(request.generation) {
            tracing::debug!(
                document_id = %request.document_id,
                request_id = %request.request_id,
                succeeded = result.is_ok(),
                "discarding result of a stale save"
            );
            return SaveOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                self.store
                    .mark_persisted(&request.document_id, request.content.clone());
                self.tracker.record_success(chrono::Utc::now());
                tracing::info!(
                    document_id = %request.document_id,
                    trigger = ?request.trigger,
                    "chapter saved"
                );
                SaveOutcome::Saved
            }
            Err(err) => {
                tracing::warn!(
                    document_id = %request.document_id,
                    trigger = ?request.trigger,
                    transient = err.is_transient(),
                    error = %err,
                    "chapter save failed"
                );
                self.tracker.record_failure(err.clone());
                SaveOutcome::Failed(err)
            }
        }
    }
}

/// 세션 핸들들과 타이머 태스크가 공유하는 내부 상태
struct Shared<G> {
    gateway: G,
    options: SessionOptions,
    state: Mutex<SessionState>,
    /// 현재 세대의 저장이 끝날 때마다 타이머 주기를 다시 시작시키는 신호
    restart: Arc<Notify>,
    /// 어떤 저장이든 끝나면 보내는 신호
    settled: Notify,
}

impl<G: ChapterGateway> Shared<G> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // 잠금을 쥔 채 패닉하는 코드 경로가 없으므로 poison 상태여도 내부 값을 그대로 씁니다.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 저장 한 번의 전체 흐름
    ///
    /// 잠금은 1단계와 3단계에서만 잡고, 2단계의 `.await` 동안에는 풀려 있습니다.
    /// 그 사이 들어온 편집은 다음 스냅샷에 포함됩니다.
    async fn save(&self, trigger: SaveTrigger) -> SaveOutcome {
        // ── 1단계: 확인 + 진행 중 표시 + 스냅샷 (같은 동기 구간) ──
        let request = {
            let mut state = self.lock();
            let Some(generation) = state.generation else {
                return SaveOutcome::Skipped(SkipReason::NotOpen);
            };
            // MutexGuard를 한 번 역참조해 두면 필드별로 따로 빌릴 수 있습니다.
            // (schedule은 &mut, store는 & 로 동시에)
            let state = &mut *state;
            match state.schedule.begin(trigger, &state.store, generation) {
                Ok(request) => request,
                Err(reason) => {
                    tracing::debug!(?trigger, ?reason, "save skipped");
                    return SaveOutcome::Skipped(reason);
                }
            }
        };

        // ── 2단계: 네트워크 호출 (유일한 중단 지점) ──
        let options = PersistOptions {
            silent: trigger.is_silent(),
        };
        let result = self.gateway.persist_chapter_content(&request, options).await;

        // ── 3단계: 결과 반영 + 알림 ──
        let outcome = self.lock().complete(&request, result);
        // 이전 문서의 저장은 새 문서의 타이머 주기에 영향을 주지 않습니다.
        if outcome != SaveOutcome::Discarded {
            self.restart.notify_waiters();
        }
        self.settled.notify_waiters();
        outcome
    }
}

/// 챕터 편집 세션
///
/// `Clone`은 같은 세션을 가리키는 핸들을 복제합니다. (내부적으로 Arc)
/// 여러 태스크에서 같은 세션을 다룰 때 핸들을 clone해서 넘기면 됩니다.
pub struct Session<G> {
    shared: Arc<Shared<G>>,
}

// #[derive(Clone)]은 G: Clone을 요구하므로 직접 구현합니다. (Arc만 복제)
impl<G> Clone for Session<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: ChapterGateway> Session<G> {
    pub fn new(gateway: G, options: SessionOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                options,
                state: Mutex::new(SessionState::default()),
                restart: Arc::new(Notify::new()),
                settled: Notify::new(),
            }),
        }
    }

    /// 챕터를 조회해 로딩하고 자동 저장 타이머를 시작합니다.
    ///
    /// 이전 문서의 타이머는 즉시 취소되고, 저장되지 않은 편집은 버려집니다.
    /// 조회에 실패하면 열린 문서가 없는 상태로 에러를 반환합니다.
    /// 조회 도중 다른 `open`이 시작되면 `SessionError::Superseded`를 반환합니다.
    pub async fn open(&self, document_id: &str) -> Result<(), SessionError> {
        let generation = Uuid::now_v7();

        // ── 1단계: 이전 문서 정리 + 새 세대 등록 ──
        {
            let mut state = self.shared.lock();
            state.reset();
            state.generation = Some(generation);
        }

        // ── 2단계: 챕터 조회 (잠금 없이) ──
        let fetched = self.shared.gateway.fetch_chapter(document_id).await;

        // ── 3단계: 세대 확인 후 로딩 + 타이머 시작 ──
        let mut state = self.shared.lock();
        if state.generation != Some(generation) {
            return Err(SessionError::Superseded);
        }
        let chapter = match fetched {
            Ok(chapter) => chapter,
            Err(err) => {
                state.generation = None;
                return Err(err.into());
            }
        };

        state.store.load(&chapter.id, &chapter.title, chapter.content());
        state.timer = Some(self.spawn_timer());
        tracing::info!(
            document_id = %chapter.id,
            title = %chapter.title,
            interval_secs = self.shared.options.autosave_interval.as_secs(),
            "chapter opened"
        );
        Ok(())
    }

    fn spawn_timer(&self) -> AutosaveTimer {
        // Weak: 타이머 태스크가 세션을 살려두지 않도록 약한 참조를 사용합니다.
        // 세션 핸들이 모두 drop되면 upgrade()가 None을 반환하고 타이머가 끝납니다.
        let weak: Weak<Shared<G>> = Arc::downgrade(&self.shared);
        AutosaveTimer::spawn(
            self.shared.options.autosave_interval,
            Arc::clone(&self.shared.restart),
            move || {
                let weak = weak.clone();
                async move {
                    let Some(shared) = weak.upgrade() else {
                        return false;
                    };
                    // 저장은 타이머와 별개의 태스크에서 실행됩니다.
                    // 타이머가 abort되면 JoinHandle만 버려지고 저장 태스크는 계속 진행됩니다.
                    let save = tokio::spawn(async move {
                        shared.save(SaveTrigger::Timer).await;
                    });
                    if let Err(err) = save.await {
                        tracing::warn!(error = %err, "autosave task failed");
                    }
                    true
                }
            },
        )
    }

    /// 편집 내용을 반영합니다.
    pub fn edit(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let mut state = self.shared.lock();
        state.store.set_content(text)?;
        state.tracker.record_edit();
        Ok(())
    }

    /// "AI Structure" 블록을 내용 끝에 덧붙입니다.
    pub fn insert_ai_structure(&self, prompt: &str) -> Result<(), SessionError> {
        let mut state = self.shared.lock();
        state
            .store
            .append(&format!("\n\n## AI Structure\n{}", prompt))?;
        state.tracker.record_edit();
        Ok(())
    }

    /// 저장합니다. `explicit`이 false면 타이머 경로(변경 없으면 건너뜀, 성공 알림 없음)입니다.
    pub async fn save(&self, explicit: bool) -> SaveOutcome {
        let trigger = if explicit {
            SaveTrigger::Explicit
        } else {
            SaveTrigger::Timer
        };
        self.shared.save(trigger).await
    }

    /// 열린 문서의 진행 중인 저장이 끝날 때까지 기다립니다.
    ///
    /// 진행 중인 저장이 없으면 바로 반환합니다.
    pub async fn wait_for_save(&self) {
        loop {
            // enable(): 상태를 확인하기 "전에" 대기자로 등록해 두어야
            // 확인과 await 사이에 온 notify_waiters()를 놓치지 않습니다.
            let settled = self.shared.settled.notified();
            tokio::pin!(settled);
            settled.as_mut().enable();

            let saving = self.shared.lock().saving_current();
            if !saving {
                return;
            }
            settled.await;
        }
    }

    /// 진행 중인 저장을 기다린 뒤, 남은 변경이 있으면 명시적으로 저장합니다.
    ///
    /// # 반환값
    /// - `Saved`: 남은 변경을 저장함
    /// - `Skipped(Clean)`: 기다린 저장으로 이미 모두 저장됨
    /// - `Skipped(NotOpen)`: 열린 문서 없음
    /// - `Failed(..)`: 마지막 저장 시도가 실패함 (로컬 내용은 유지)
    pub async fn flush(&self) -> SaveOutcome {
        loop {
            self.wait_for_save().await;
            {
                let state = self.shared.lock();
                if state.store.document().is_none() {
                    return SaveOutcome::Skipped(SkipReason::NotOpen);
                }
                if !state.store.is_dirty() {
                    return SaveOutcome::Skipped(SkipReason::Clean);
                }
            }
            match self.save(true).await {
                // 기다리는 사이 타이머가 먼저 저장을 시작했으면 다시 기다립니다.
                SaveOutcome::Skipped(SkipReason::InFlight) => continue,
                outcome => return outcome,
            }
        }
    }

    /// 키 입력을 처리합니다. 저장 단축키면 명시적 저장을 실행합니다.
    pub async fn handle_key(&self, key: &KeyPress) -> KeyHandling {
        if key.is_save_shortcut() {
            KeyHandling::Suppressed(self.shared.save(SaveTrigger::Shortcut).await)
        } else {
            KeyHandling::PassThrough
        }
    }

    /// 타이머를 취소하고 문서를 닫습니다.
    ///
    /// 진행 중인 저장(명시적/타이머 모두)은 기다리지 않고 취소하지도 않습니다.
    /// 그 저장은 끝까지 실행되지만 결과는 버려집니다.
    /// 저장을 보장하려면 먼저 `flush()`를 await하세요.
    pub fn close(&self) {
        let mut state = self.shared.lock();
        let document_id = state.store.document().map(|doc| doc.id.clone());
        let dirty = state.store.is_dirty();
        state.reset();
        tracing::info!(?document_id, unsaved_changes = dirty, "chapter closed");
    }

    pub fn status(&self) -> SaveStatus {
        self.shared.lock().status()
    }

    pub fn content(&self) -> String {
        self.shared.lock().store.content().to_string()
    }

    pub fn document_id(&self) -> Option<String> {
        self.shared.lock().store.document().map(|doc| doc.id.clone())
    }

    pub fn is_dirty(&self) -> bool {
        self.shared.lock().store.is_dirty()
    }

    /// 화면 표시용 스냅샷
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.shared.lock();
        let content = state.store.content().to_string();
        let document = state.store.document();

        SessionSnapshot {
            document_id: document.map(|doc| doc.id.clone()),
            title: document.map(|doc| doc.title.clone()),
            status: state.status(),
            dirty: state.store.is_dirty(),
            word_count: services::count_words(&content),
            char_count: services::count_chars(&content),
            excerpt: services::excerpt(&content, EXCERPT_CHARS).to_string(),
            last_saved_at: state.tracker.last_saved_at(),
            last_error: state.tracker.failure().map(|err| err.user_message()),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::testing::{wait_for_calls, FakeGateway};
    use crate::error::LookupError;
    use crate::gateway::Notifying;
    use crate::services::{ChannelNotifier, Notice};

    async fn open_session(chapters: &[(&str, &str)], id: &str) -> (Session<Arc<FakeGateway>>, Arc<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::with_chapters(chapters));
        let session = Session::new(gateway.clone(), SessionOptions::default());
        session.open(id).await.unwrap();
        (session, gateway)
    }

    #[tokio::test]
    async fn explicit_save_moves_from_saving_to_saved() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("# Title").unwrap();
        assert_eq!(session.status(), SaveStatus::Idle);

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;
        assert_eq!(session.status(), SaveStatus::Saving);

        gateway.release();
        assert_eq!(handle.await.unwrap(), SaveOutcome::Saved);
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());
        assert_eq!(gateway.requests()[0].content, "# Title");
        assert!(!gateway.options()[0].silent);
        assert!(session.snapshot().last_saved_at.is_some());
    }

    #[tokio::test]
    async fn failed_save_keeps_local_content() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("# Title").unwrap();
        gateway.push_result(Err(SaveError::Network("connection reset".to_string())));

        let outcome = session.save(true).await;
        assert_eq!(
            outcome,
            SaveOutcome::Failed(SaveError::Network("connection reset".to_string()))
        );
        assert_eq!(session.status(), SaveStatus::Error);
        assert_eq!(session.content(), "# Title");
        assert!(session.is_dirty());
        assert!(session.snapshot().last_error.is_some());
    }

    #[tokio::test]
    async fn edit_after_failure_clears_error() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("a").unwrap();
        gateway.push_result(Err(SaveError::ServerRejected("nope".to_string())));
        session.save(true).await;
        assert_eq!(session.status(), SaveStatus::Error);

        session.edit("ab").unwrap();
        assert_eq!(session.status(), SaveStatus::Idle);

        // 명시적 저장은 이전 실패와 무관하게 다시 시도합니다.
        assert_eq!(session.save(true).await, SaveOutcome::Saved);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn undo_to_baseline_reports_saved() {
        let (session, _gateway) = open_session(&[("c1", "base")], "c1").await;
        session.edit("base!").unwrap();
        assert_eq!(session.status(), SaveStatus::Idle);
        session.edit("base").unwrap();
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn edits_during_save_go_to_the_next_snapshot() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("first").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;
        session.edit("first second").unwrap();
        gateway.release();

        assert_eq!(handle.await.unwrap(), SaveOutcome::Saved);
        assert_eq!(gateway.requests()[0].content, "first");
        // 저장 중에 들어온 편집은 아직 저장되지 않았습니다.
        assert_eq!(session.status(), SaveStatus::Idle);

        gateway.release();
        assert_eq!(session.save(true).await, SaveOutcome::Saved);
        assert_eq!(gateway.requests()[1].content, "first second");
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn only_one_save_in_flight() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("x").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;

        assert_eq!(
            session.save(false).await,
            SaveOutcome::Skipped(SkipReason::InFlight)
        );
        assert_eq!(
            session.save(true).await,
            SaveOutcome::Skipped(SkipReason::InFlight)
        );
        let key = session.handle_key(&KeyPress::new("s").with_ctrl()).await;
        assert_eq!(key, KeyHandling::Suppressed(SaveOutcome::Skipped(SkipReason::InFlight)));

        gateway.release();
        assert_eq!(handle.await.unwrap(), SaveOutcome::Saved);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn stale_save_does_not_touch_the_new_document() {
        let (session, gateway) = open_session(&[("a", ""), ("b", "b")], "a").await;
        session.edit("a edited").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;

        session.open("b").await.unwrap();
        gateway.release();

        assert_eq!(handle.await.unwrap(), SaveOutcome::Discarded);
        assert_eq!(session.document_id().as_deref(), Some("b"));
        assert_eq!(session.content(), "b");
        assert_eq!(session.status(), SaveStatus::Saved);

        session.edit("b edited").unwrap();
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn open_missing_chapter_fails() {
        let gateway = Arc::new(FakeGateway::with_chapters(&[]));
        let session = Session::new(gateway, SessionOptions::default());

        let err = session.open("missing").await.unwrap_err();
        assert_eq!(err, SessionError::Load(LookupError::NotFound("missing".to_string())));
        assert_eq!(session.status(), SaveStatus::Idle);
        assert_eq!(session.edit("x"), Err(SessionError::NotOpen));
        assert_eq!(
            session.save(true).await,
            SaveOutcome::Skipped(SkipReason::NotOpen)
        );
    }

    #[tokio::test]
    async fn shortcut_saves_and_other_keys_pass_through() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("x").unwrap();

        let plain = session.handle_key(&KeyPress::new("a").with_ctrl()).await;
        assert_eq!(plain, KeyHandling::PassThrough);
        assert!(!plain.prevents_default());

        let handled = session.handle_key(&KeyPress::new("s").with_meta()).await;
        assert!(handled.prevents_default());
        assert_eq!(handled, KeyHandling::Suppressed(SaveOutcome::Saved));
        assert_eq!(gateway.requests()[0].trigger, SaveTrigger::Shortcut);
        assert!(!gateway.options()[0].silent);
    }

    #[tokio::test]
    async fn ai_structure_is_appended() {
        let (session, _gateway) = open_session(&[("c1", "# Notes")], "c1").await;
        session.insert_ai_structure("Outline the proof").unwrap();
        assert_eq!(session.content(), "# Notes\n\n## AI Structure\nOutline the proof");
        assert_eq!(session.snapshot().word_count, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_does_not_save_clean_content() {
        let (session, gateway) = open_session(&[("c1", "# Title")], "c1").await;

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_saves_dirty_content_silently() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("draft").unwrap();

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(gateway.call_count(), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(gateway.call_count(), 1);
        assert!(gateway.options()[0].silent);
        assert_eq!(gateway.requests()[0].trigger, SaveTrigger::Timer);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_failure_waits_for_the_next_tick() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("draft").unwrap();
        gateway.push_result(Err(SaveError::Network("offline".to_string())));

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(session.status(), SaveStatus::Error);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(gateway.call_count(), 1);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_the_timer() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("unsaved").unwrap();
        session.close();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(session.document_id(), None);
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[tokio::test]
    async fn snapshot_carries_a_short_excerpt() {
        let long = "가".repeat(300);
        let (session, _gateway) = open_session(&[("c1", long.as_str())], "c1").await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.excerpt.chars().count(), 120);
        assert_eq!(snapshot.char_count, 300);
        assert!(!snapshot.dirty);
    }

    #[tokio::test]
    async fn reopening_a_chapter_waits_for_its_previous_save() {
        let (session, gateway) = open_session(&[("a", "")], "a").await;
        session.edit("old").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;

        // 이전 PUT이 끝나기 전에는 같은 문서의 새 저장을 시작하지 않습니다.
        session.open("a").await.unwrap();
        session.edit("new").unwrap();
        assert_eq!(session.status(), SaveStatus::Saving);
        assert_eq!(
            session.save(true).await,
            SaveOutcome::Skipped(SkipReason::InFlight)
        );

        gateway.release();
        assert_eq!(handle.await.unwrap(), SaveOutcome::Discarded);
        assert_eq!(session.status(), SaveStatus::Idle);

        gateway.release();
        assert_eq!(session.save(true).await, SaveOutcome::Saved);
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.max_concurrent(), 1);
        assert_eq!(gateway.requests()[1].content, "new");
    }

    #[tokio::test]
    async fn close_then_open_does_not_overlap_saves() {
        let (session, gateway) = open_session(&[("a", "")], "a").await;
        session.edit("old").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;

        session.close();
        session.open("a").await.unwrap();
        assert_eq!(
            session.save(true).await,
            SaveOutcome::Skipped(SkipReason::InFlight)
        );

        gateway.release();
        assert_eq!(handle.await.unwrap(), SaveOutcome::Discarded);
        assert_eq!(gateway.max_concurrent(), 1);
    }

    #[tokio::test]
    async fn stale_save_still_reports_its_own_result() {
        // 알림 데코레이터는 세션 세대를 모르므로, 이전 문서의 저장 결과도 그대로 알립니다.
        let (notifier, mut notices) = ChannelNotifier::channel();
        let fake = Arc::new(FakeGateway::with_chapters(&[("a", ""), ("b", "")]));
        let session = Session::new(
            Notifying::new(fake.clone(), Arc::new(notifier)),
            SessionOptions::default(),
        );
        session.open("a").await.unwrap();
        session.edit("a edited").unwrap();

        fake.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&fake, 1).await;
        session.open("b").await.unwrap();
        fake.release();

        assert_eq!(handle.await.unwrap(), SaveOutcome::Discarded);
        assert_eq!(
            notices.try_recv().unwrap(),
            Notice::success(crate::gateway::notifying::SAVE_SUCCESS_MESSAGE)
        );
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_save_restarts_the_autosave_interval() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("draft").unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.save(true).await, SaveOutcome::Saved);
        session.edit("draft 2").unwrap();

        // 원래 주기(15초)에는 타이머가 저장하지 않습니다.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(gateway.call_count(), 1);

        // 명시적 저장 후 15초(25초 시점)에 저장합니다.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.requests()[1].trigger, SaveTrigger::Timer);
        assert_eq!(gateway.requests()[1].content, "draft 2");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_save_does_not_restart_the_new_timer() {
        let (session, gateway) = open_session(&[("a", ""), ("b", "")], "a").await;
        session.edit("a edited").unwrap();

        gateway.hold_saves();
        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.save(true).await })
        };
        wait_for_calls(&gateway, 1).await;

        session.open("b").await.unwrap();
        session.edit("b edited").unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        gateway.release();
        assert_eq!(handle.await.unwrap(), SaveOutcome::Discarded);

        // b의 타이머는 여는 시점부터 15초 주기를 그대로 유지합니다.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.requests()[1].document_id, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn close_during_timer_save_lets_it_finish() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("draft").unwrap();
        gateway.hold_saves();

        tokio::time::sleep(Duration::from_millis(15_500)).await;
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(session.status(), SaveStatus::Saving);

        session.close();
        gateway.release();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(gateway.completed_count(), 1);

        // 타이머는 멈췄으므로 추가 저장은 없습니다.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_waits_for_the_timer_save_then_saves_the_rest() {
        let (session, gateway) = open_session(&[("c1", "")], "c1").await;
        session.edit("draft").unwrap();
        gateway.hold_saves();

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(gateway.call_count(), 1);
        session.edit("draft more").unwrap();

        let handle = {
            let session = session.clone();
            tokio::spawn(async move { session.flush().await })
        };
        gateway.release();
        gateway.release();

        assert_eq!(handle.await.unwrap(), SaveOutcome::Saved);
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.max_concurrent(), 1);
        assert_eq!(gateway.requests()[1].content, "draft more");
        assert_eq!(gateway.requests()[1].trigger, SaveTrigger::Explicit);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn flush_of_clean_or_closed_session_sends_nothing() {
        let (session, gateway) = open_session(&[("c1", "same")], "c1").await;
        assert_eq!(session.flush().await, SaveOutcome::Skipped(SkipReason::Clean));

        session.close();
        assert_eq!(session.flush().await, SaveOutcome::Skipped(SkipReason::NotOpen));
        assert_eq!(gateway.call_count(), 0);
    }
}

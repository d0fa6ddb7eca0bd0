//! # 자동 저장 스케줄러 (Autosave Scheduler)
//!
//! 저장을 **언제** 할지 결정합니다.
//!
//! ## 저장 계기
//! 1. 타이머: 고정 주기가 지났을 때, 변경 사항이 있고 진행 중인 저장이 없으면 저장
//! 2. 명시적 명령: 타이머 상태와 무관하게 즉시 시도 (진행 중인 저장만 확인)
//! 3. 단축키: 명시적 명령과 동일
//!
//! ## 병합 규칙
//! 문서당 진행 중인 저장은 최대 한 개입니다. 저장 중에 들어온 계기는 무시됩니다.
//! 확인(check)과 표시(set)는 같은 동기 구간에서 이루어집니다: `begin()`은 await 없이 끝납니다.
//!
//! ## 타이머
//! 편집할 때마다 다시 시작하는 디바운스가 아니라 고정 주기 폴링입니다.
//! 저장이 끝날 때마다(성공/실패 모두) 주기가 다시 시작됩니다.

use crate::editor::store::ContentStore;
use crate::gateway::PersistRequest;
use crate::models::{SaveTrigger, SkipReason};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// 진행 중인 저장 목록
///
/// 문서 ID → 진행 중인 요청 ID. 세션이 다른 문서로 전환되거나
/// 같은 문서를 다시 열어도 이 목록은 초기화하지 않습니다.
/// 이전 세대의 PUT이 끝날 때까지 같은 문서의 새 저장은 `InFlight`로 건너뜁니다.
#[derive(Debug, Default)]
pub struct ScheduleState {
    // HashMap<K, V>: 문서마다 최대 한 개의 요청만 기록됩니다.
    in_flight: HashMap<String, Uuid>,
}

impl ScheduleState {
    /// 해당 문서의 저장이 진행 중인지 확인합니다.
    pub fn is_in_flight(&self, document_id: &str) -> bool {
        self.in_flight.contains_key(document_id)
    }

    /// 저장을 시작할 수 있으면 내용 스냅샷으로 요청을 만들고 진행 중으로 표시합니다.
    ///
    /// # 확인 순서
    /// 1. 열린 문서가 없으면 `NotOpen`
    /// 2. 같은 문서의 저장이 진행 중이면 `InFlight` (이전 세대의 요청 포함)
    /// 3. 타이머 계기이고 변경 사항이 없으면 `Clean`
    pub fn begin(
        &mut self,
        trigger: SaveTrigger,
        store: &ContentStore,
        generation: Uuid,
    ) -> Result<PersistRequest, SkipReason> {
        let document = store.document().ok_or(SkipReason::NotOpen)?;
        if self.is_in_flight(&document.id) {
            return Err(SkipReason::InFlight);
        }
        // 명시적 저장은 깨끗한 상태에서도 시도합니다.
        if trigger == SaveTrigger::Timer && !document.is_dirty() {
            return Err(SkipReason::Clean);
        }

        let request = PersistRequest {
            request_id: Uuid::now_v7(),
            document_id: document.id.clone(),
            generation,
            content: document.content().to_string(),
            trigger,
        };
        self.in_flight
            .insert(request.document_id.clone(), request.request_id);
        Ok(request)
    }

    /// 진행 중 표시를 해제합니다. 다른 요청의 ID면 무시합니다.
    pub fn finish(&mut self, document_id: &str, request_id: Uuid) -> bool {
        if self.in_flight.get(document_id) == Some(&request_id) {
            self.in_flight.remove(document_id);
            true
        } else {
            false
        }
    }
}

/// 실행 중인 자동 저장 타이머
///
/// drop되거나 `cancel()`되면 타이머 태스크가 중단됩니다.
#[derive(Debug)]
pub struct AutosaveTimer {
    handle: JoinHandle<()>,
}

impl AutosaveTimer {
    /// 주기마다 `tick`을 실행하는 타이머 태스크를 시작합니다.
    ///
    /// - `restart`가 알림을 받으면 남은 대기 시간을 버리고 주기를 처음부터 다시 셉니다.
    /// - `tick`이 `false`를 반환하면 타이머가 끝납니다. (세션이 사라진 경우)
    /// - 타이머를 중단해도 `tick`이 별도 태스크로 띄운 작업은 계속 진행됩니다.
    ///   중단은 "다음 틱"만 막습니다.
    pub fn spawn<F, Fut>(interval: Duration, restart: Arc<Notify>, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        if !tick().await {
                            break;
                        }
                    }
                    _ = restart.notified() => {}
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for AutosaveTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

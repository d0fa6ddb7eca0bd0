//! # 사용자 알림 서비스
//!
//! 저장 성공/실패를 사용자에게 알리는 통로입니다. (웹 클라이언트의 토스트 알림에 해당)
//!
//! - `TracingNotifier`: 알림을 로그로만 남김 (기본값)
//! - `ChannelNotifier`: 알림을 mpsc 채널로 보내 화면 쪽에서 소비하게 함

use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 사용자에게 보여줄 알림 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// 알림을 전달하는 트레이트
///
/// 게이트웨이와 타이머 태스크 사이에서 공유되므로 `Send + Sync`가 필요합니다.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// 알림을 tracing 로그로 출력합니다.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

/// 알림을 채널로 전달합니다.
///
/// 수신 측이 이미 닫혔으면 알림은 조용히 버려집니다.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// 알리미와 수신기 쌍을 만듭니다.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice receiver dropped");
        }
    }
}

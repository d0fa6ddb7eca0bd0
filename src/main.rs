//! # Gradly 챕터 에디터 터미널 드라이버
//!
//! 표준입력의 각 줄을 세션 컨트롤러 호출로 바꿔주는 얇은 진입점입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩 및 HTTP 게이트웨이 생성
//! 4. 챕터 열기 (실패 시 종료 코드 1)
//! 5. 입력 루프: 명령 실행 또는 본문 추가
//!
//! ## 명령
//! | 입력 | 동작 |
//! |------|------|
//! | `:w` | 명시적 저장 |
//! | `^S` (제어문자 0x13) | 단축키 저장 |
//! | `:s` | 현재 상태 스냅샷(JSON) 출력 |
//! | `:ai <prompt>` | AI Structure 블록 추가 |
//! | `:q` | 진행 중인 저장을 기다리고 남은 변경 저장 후 종료 |
//! | `:q!` | 저장하지 않고 종료 |
//! | 그 외 | 본문 끝에 한 줄 추가 |

use anyhow::{Context, Result};
use gradly_editor::services::{ChannelNotifier, NoticeLevel};
use gradly_editor::{
    Config, HttpGateway, KeyPress, Notifying, SaveOutcome, Session, SessionOptions, SkipReason,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 입력 한 줄을 해석한 결과
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Save,
    Shortcut,
    Snapshot,
    Ai(String),
    Quit,
    ForceQuit,
    Append(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim_end_matches('\r') {
            ":w" => Command::Save,
            "\u{13}" => Command::Shortcut,
            ":s" => Command::Snapshot,
            ":q" => Command::Quit,
            ":q!" => Command::ForceQuit,
            other => match other.strip_prefix(":ai ") {
                Some(prompt) => Command::Ai(prompt.to_string()),
                None => Command::Append(other.to_string()),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 표준출력은 스냅샷 출력에 쓰므로 로그는 stderr로 보냅니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gradly_editor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let chapter_id = std::env::args()
        .nth(1)
        .context("usage: gradly-editor <chapter-id>")?;

    let config = Config::from_env()?;
    tracing::info!(
        "Using Gradly API at {} (autosave every {}s)",
        config.api_base_url,
        config.autosave_interval.as_secs()
    );

    let (notifier, mut notices) = ChannelNotifier::channel();
    let gateway = Notifying::new(HttpGateway::new(&config)?, Arc::new(notifier));
    let session = Session::new(gateway, SessionOptions::from(&config));

    if let Err(err) = session.open(&chapter_id).await {
        tracing::error!("Failed to open chapter {}: {}", chapter_id, err);
        return Err(err.into());
    }

    // 토스트 알림 대신 stderr에 출력합니다.
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            let tag = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Error => "error",
            };
            eprintln!("[{}] {}", tag, notice.message);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Save => {
                session.save(true).await;
            }
            Command::Shortcut => {
                session.handle_key(&KeyPress::new("s").with_ctrl()).await;
            }
            Command::Snapshot => {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
            Command::Ai(prompt) => session.insert_ai_structure(&prompt)?,
            Command::Quit => {
                // 타이머 저장이 진행 중이면 끝날 때까지 기다린 뒤 남은 변경을 저장합니다.
                match session.flush().await {
                    SaveOutcome::Saved | SaveOutcome::Skipped(SkipReason::Clean) => {}
                    outcome => {
                        tracing::warn!(?outcome, "Closing with unsaved changes");
                    }
                }
                break;
            }
            Command::ForceQuit => break,
            Command::Append(text) => {
                let mut content = session.content();
                content.push_str(&text);
                content.push('\n');
                session.edit(content)?;
            }
        }
    }

    session.close();
    Ok(())
}

//! # HTTP 게이트웨이
//!
//! Gradly REST API를 reqwest로 호출하는 게이트웨이 구현입니다.
//!
//! ## 사용하는 엔드포인트
//! | 메서드 | 경로 | 용도 |
//! |--------|------|------|
//! | GET | {base}/chapters?_id={id} | 챕터 조회 (필터 결과 목록에서 ID로 선택) |
//! | PUT | {base}/chapters/{id} | 챕터 내용 저장 (multipart 필드 `markdownContent`) |
//!
//! 모든 응답은 `{ "status": "success", "message": ..., "data": ... }` 형식입니다.

use crate::config::Config;
use crate::error::{LookupError, SaveError};
use crate::gateway::{ChapterLookup, ChapterUpdate, PersistOptions, PersistRequest};
use crate::models::{ApiEnvelope, Chapter};
use reqwest::{multipart, RequestBuilder, StatusCode};

/// reqwest 기반 Gradly API 클라이언트
#[derive(Debug, Clone)]
pub struct HttpGateway {
    // reqwest::Client는 내부적으로 Arc를 사용하므로 clone해도 연결 풀을 공유합니다.
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    /// 설정값으로 HTTP 클라이언트를 만듭니다.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    // 토큰이 설정되어 있으면 Authorization 헤더를 붙입니다.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl ChapterLookup for HttpGateway {
    async fn fetch_chapter(&self, document_id: &str) -> Result<Chapter, LookupError> {
        // ── 1단계: 요청 전송 ──
        // .query(): URL 쿼리 문자열을 인코딩해 붙입니다. (?_id=...)
        // `?`: reqwest::Error가 From 구현을 통해 LookupError::Network로 변환됩니다.
        let url = format!("{}/chapters", self.base_url);
        let response = self
            .authorize(self.client.get(&url).query(&[("_id", document_id)]))
            .send()
            .await?;

        // ── 2단계: HTTP 상태 코드 확인 ──
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(document_id.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Network(format!("HTTP {}", status)));
        }

        // ── 3단계: envelope 파싱 + 목록에서 ID로 선택 ──
        // 타입 주석(ApiEnvelope<Vec<Chapter>>)으로 serde가 어떤 구조로 역직렬화할지 결정합니다.
        let envelope: ApiEnvelope<Vec<Chapter>> = response.json().await?;
        if !envelope.is_success() {
            // 실패 envelope은 빈 목록과 같게 취급합니다.
            tracing::debug!(
                document_id,
                message = ?envelope.message,
                "chapter lookup returned a non-success envelope"
            );
            return Err(LookupError::NotFound(document_id.to_string()));
        }

        envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .find(|chapter| chapter.id == document_id)
            .ok_or_else(|| LookupError::NotFound(document_id.to_string()))
    }
}

impl ChapterUpdate for HttpGateway {
    async fn persist_chapter_content(
        &self,
        request: &PersistRequest,
        options: PersistOptions,
    ) -> Result<(), SaveError> {
        // ── 1단계: multipart 본문 구성 ──
        // Form::text(): 파일이 아닌 일반 텍스트 필드 하나를 추가합니다.
        // Form이 필드 값의 소유권을 가져가므로 내용을 clone합니다.
        let url = format!("{}/chapters/{}", self.base_url, request.document_id);
        let form = multipart::Form::new().text("markdownContent", request.content.clone());

        tracing::debug!(
            document_id = %request.document_id,
            request_id = %request.request_id,
            silent = options.silent,
            bytes = request.content.len(),
            "PUT chapter content"
        );

        // ── 2단계: PUT 전송 (타임아웃/연결 실패는 SaveError::Network) ──
        let response = self
            .authorize(self.client.put(&url).multipart(form))
            .send()
            .await?;

        // ── 3단계: 응답 분류 ──
        // 상태 코드 → envelope.status 순서로 확인합니다.
        let status = response.status();
        let body = response.text().await?;
        // 본문이 JSON이 아니어도 상태 코드로 분류할 수 있도록 Option으로 파싱합니다.
        let envelope = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body).ok();

        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SaveError::ServerRejected(message));
        }

        match envelope {
            Some(envelope) if envelope.is_success() => Ok(()),
            Some(envelope) => Err(SaveError::ServerRejected(
                envelope.message.unwrap_or_default(),
            )),
            None => Err(SaveError::Unknown(format!(
                "unreadable response body ({} bytes)",
                body.len()
            ))),
        }
    }
}

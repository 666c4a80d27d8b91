use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    BatchTranscriptionClient, JobSnapshot, SpeechServiceError, TranscriptionJob,
};
use crate::domain::{Transcript, TranscriptionStatus, WordTiming};
use crate::infrastructure::observability::redact_signed_url;

pub const API_PATH: &str = "speechtotext/v3.1";
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_PUNCTUATION_MODE: &str = "DictatedAndAutomatic";
pub const DEFAULT_DISPLAY_NAME: &str = "Video Transcription";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const TRANSCRIPTION_FILE_KIND: &str = "Transcription";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Job options sent with every submission.
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub locale: String,
    pub display_name: String,
    pub punctuation_mode: String,
    pub word_level_timestamps: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            punctuation_mode: DEFAULT_PUNCTUATION_MODE.to_string(),
            word_level_timestamps: false,
        }
    }
}

/// Client for the Azure Speech batch transcription REST API.
pub struct AzureBatchTranscriptionClient {
    client: Client,
    transcriptions_url: Url,
    api_key: String,
    options: JobOptions,
}

impl AzureBatchTranscriptionClient {
    /// Targets the regional public endpoint.
    pub fn for_region(
        region: &str,
        api_key: &str,
        options: JobOptions,
    ) -> Result<Self, SpeechServiceError> {
        let base_url = format!("https://{}.api.cognitive.microsoft.com", region.trim());
        Self::with_endpoint(&base_url, api_key, options)
    }

    /// Targets an explicit endpoint, e.g. a private link or a local mock.
    pub fn with_endpoint(
        base_url: &str,
        api_key: &str,
        options: JobOptions,
    ) -> Result<Self, SpeechServiceError> {
        let transcriptions_url = Url::parse(&format!(
            "{}/{}/transcriptions",
            base_url.trim_end_matches('/'),
            API_PATH
        ))
        .map_err(|e| SpeechServiceError::Request(format!("invalid endpoint: {}", e)))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpeechServiceError::Request(format!("client: {}", e)))?;

        Ok(Self {
            client,
            transcriptions_url,
            api_key: api_key.to_string(),
            options,
        })
    }

    pub fn transcriptions_url(&self) -> &Url {
        &self.transcriptions_url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &Url,
        authenticated: bool,
    ) -> Result<T, SpeechServiceError> {
        let mut request = self.client.get(url.clone());
        if authenticated {
            request = request.header(SUBSCRIPTION_KEY_HEADER, &self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SpeechServiceError::Request(e.to_string()))?;

        parse_json(response).await
    }
}

async fn parse_json<T: for<'de> Deserialize<'de>>(
    response: Response,
) -> Result<T, SpeechServiceError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(SpeechServiceError::UnexpectedStatus { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| SpeechServiceError::InvalidResponse(e.to_string()))
}

fn parse_url(raw: &str) -> Result<Url, SpeechServiceError> {
    Url::parse(raw).map_err(|e| SpeechServiceError::InvalidResponse(format!("url {}: {}", raw, e)))
}

#[async_trait]
impl BatchTranscriptionClient for AzureBatchTranscriptionClient {
    async fn submit(&self, content_url: &Url) -> Result<TranscriptionJob, SpeechServiceError> {
        let body = CreateTranscriptionRequest {
            content_urls: vec![content_url.as_str()],
            locale: &self.options.locale,
            display_name: &self.options.display_name,
            properties: CreateTranscriptionProperties {
                punctuation_mode: &self.options.punctuation_mode,
                word_level_timestamps_enabled: self.options.word_level_timestamps,
            },
        };

        tracing::debug!(
            endpoint = %self.transcriptions_url,
            content_url = %redact_signed_url(content_url),
            "Submitting batch transcription"
        );

        let response = self
            .client
            .post(self.transcriptions_url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechServiceError::Request(e.to_string()))?;

        let created: TranscriptionResource = parse_json(response).await?;
        let self_url = created.self_url.ok_or_else(|| {
            SpeechServiceError::InvalidResponse("job descriptor has no self link".to_string())
        })?;
        let status_url = parse_url(&self_url)?;

        Ok(TranscriptionJob { status_url })
    }

    async fn status(&self, job: &TranscriptionJob) -> Result<JobSnapshot, SpeechServiceError> {
        let resource: TranscriptionResource = self.get_json(&job.status_url, true).await?;

        let status = TranscriptionStatus::from_str(&resource.status)
            .map_err(SpeechServiceError::InvalidResponse)?;
        let files_url = resource
            .links
            .and_then(|l| l.files)
            .map(|f| parse_url(&f))
            .transpose()?;
        let error_message = resource
            .properties
            .and_then(|p| p.error)
            .and_then(|e| e.message);

        Ok(JobSnapshot {
            status,
            files_url,
            error_message,
        })
    }

    async fn fetch_transcript(&self, files_url: &Url) -> Result<Transcript, SpeechServiceError> {
        let mut page_url = Some(files_url.clone());
        let mut content_url = None;

        while let Some(url) = page_url.take() {
            let page: FileListPage = self.get_json(&url, true).await?;

            content_url = page
                .values
                .into_iter()
                .find(|f| f.kind == TRANSCRIPTION_FILE_KIND)
                .and_then(|f| f.links.content_url);

            if content_url.is_some() {
                break;
            }
            page_url = page.next_link.as_deref().map(parse_url).transpose()?;
        }

        let content_url = parse_url(&content_url.ok_or(SpeechServiceError::MissingResultFile)?)?;

        // The content URL carries its own signature; the key must not be sent.
        let content: TranscriptionContent = self.get_json(&content_url, false).await?;

        Ok(content.into_transcript(self.options.word_level_timestamps))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTranscriptionRequest<'a> {
    content_urls: Vec<&'a str>,
    locale: &'a str,
    display_name: &'a str,
    properties: CreateTranscriptionProperties<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTranscriptionProperties<'a> {
    punctuation_mode: &'a str,
    word_level_timestamps_enabled: bool,
}

#[derive(Deserialize)]
struct TranscriptionResource {
    #[serde(rename = "self")]
    self_url: Option<String>,
    #[serde(default)]
    status: String,
    links: Option<TranscriptionLinks>,
    properties: Option<TranscriptionProperties>,
}

#[derive(Deserialize)]
struct TranscriptionLinks {
    files: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionProperties {
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct ServiceError {
    message: Option<String>,
}

#[derive(Deserialize)]
struct FileListPage {
    #[serde(default)]
    values: Vec<ResultFile>,
    #[serde(rename = "@nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct ResultFile {
    kind: String,
    links: ResultFileLinks,
}

#[derive(Deserialize)]
struct ResultFileLinks {
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionContent {
    #[serde(rename = "recognizedPhrases", default)]
    recognized_phrases: Vec<RecognizedPhrase>,
}

#[derive(Deserialize)]
struct RecognizedPhrase {
    display: Option<String>,
    #[serde(rename = "nBest", default)]
    n_best: Vec<NBestEntry>,
}

#[derive(Deserialize)]
struct NBestEntry {
    display: Option<String>,
    #[serde(default)]
    words: Vec<WordEntry>,
}

/// Ticks arrive as JSON numbers that may carry a fractional part.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordEntry {
    #[serde(default)]
    word: String,
    #[serde(default)]
    offset_in_ticks: f64,
    #[serde(default)]
    duration_in_ticks: f64,
}

impl WordEntry {
    fn into_timing(self) -> WordTiming {
        WordTiming::new(
            self.word,
            self.offset_in_ticks.round() as u64,
            self.duration_in_ticks.round() as u64,
        )
    }
}

impl TranscriptionContent {
    /// Phrase text is `display`, falling back to the best alternative. Word
    /// timings come from the best alternative of each phrase.
    fn into_transcript(self, with_words: bool) -> Transcript {
        let mut phrases = Vec::with_capacity(self.recognized_phrases.len());
        let mut words = Vec::new();

        for phrase in self.recognized_phrases {
            let best = phrase.n_best.into_iter().next();
            let (best_display, best_words) = match best {
                Some(entry) => (entry.display, entry.words),
                None => (None, Vec::new()),
            };

            if with_words {
                words.extend(best_words.into_iter().map(WordEntry::into_timing));
            }
            if let Some(text) = phrase.display.or(best_display) {
                phrases.push(text);
            }
        }

        let transcript = Transcript::new(phrases);
        if with_words {
            transcript.with_words(words)
        } else {
            transcript
        }
    }
}

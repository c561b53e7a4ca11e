use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::config::NarrativeConfig;

/// Shown whenever the narrative service fails or produces nothing. The
/// scoring report stands on its own; narrative problems never fail the run.
pub const FALLBACK_NARRATIVE: &str =
    "A narrative summary is not available right now. The score report above is complete; \
review the per-dimension breakdown with your advisor.";

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct NarrativeClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f64,
    retries: usize,
    api_key: String,
}

impl NarrativeClient {
    /// Build a client from config. The timeout bounds connection setup only;
    /// an open stream is allowed to take as long as it streams.
    pub fn new(config: &NarrativeConfig, api_key: String) -> Result<Self> {
        let timeout = config
            .timeout_duration()
            .map_err(|e| anyhow!("narrative config: {}", e))?;
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            model: config.model_name().to_string(),
            temperature: config.temperature(),
            retries: config.retries(),
            api_key,
        })
    }

    /// Send the prompt and open the streamed response.
    ///
    /// The request is retried with exponential backoff; once a stream is
    /// open it is final — a mid-stream failure surfaces as an error item,
    /// not a restart, since the sequence is not restartable.
    pub async fn open_stream(&self, prompt: &str) -> Result<impl Stream<Item = Result<String>>> {
        let retry_strategy = ExponentialBackoff::from_millis(250)
            .max_delay(Duration::from_secs(5))
            .take(self.retries);

        let response = Retry::spawn(retry_strategy, || async {
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&serde_json::json!({
                    "model": self.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "stream": true,
                    "temperature": self.temperature,
                }))
                .send()
                .await
                .map_err(|e| anyhow!("narrative request failed: {}", e))?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(anyhow!(
                    "narrative service rejected the API key (401). Check your stored credentials."
                ));
            }
            if !status.is_success() {
                return Err(anyhow!("narrative service returned {}", status));
            }
            Ok(response)
        })
        .await?;

        Ok(chunk_stream(response))
    }
}

/// Turn a streamed chat-completions response into text chunks.
fn chunk_stream(response: reqwest::Response) -> impl Stream<Item = Result<String>> {
    struct State {
        bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
        parser: SseParser,
        pending: VecDeque<String>,
        done: bool,
    }

    let state = State {
        bytes: response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed(),
        parser: SseParser::default(),
        pending: VecDeque::new(),
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.pending.pop_front() {
                return Some((Ok(chunk), state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(bytes)) => state.pending.extend(state.parser.feed(&bytes)),
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(anyhow!("narrative stream failed: {}", e)), state));
                }
                None => {
                    state.done = true;
                    state.pending.extend(state.parser.finish());
                }
            }
        }
    })
}

/// Incremental server-sent-events parser for chat-completion deltas.
///
/// Buffers raw bytes so multi-byte characters and `data:` lines split across
/// network reads reassemble correctly, and emits the delta content of each
/// complete event line.
#[derive(Default)]
struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    /// Feed raw bytes; returns the content chunks completed by them.
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut chunks = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(content) = parse_data_line(line.trim_end()) {
                chunks.push(content);
            }
        }
        chunks
    }

    /// Flush a trailing line that never got its newline.
    fn finish(&mut self) -> Vec<String> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let line = String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned();
        parse_data_line(line.trim_end()).into_iter().collect()
    }
}

/// Extract the delta content from one SSE line, if it carries any.
fn parse_data_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    let event: serde_json::Value = serde_json::from_str(payload).ok()?;
    let content = event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

/// Remove markdown emphasis and heading markers before display.
pub fn strip_markup(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '#'))
        .collect()
}

/// Drain a narrative stream into a writer, stripping markup as it goes.
///
/// Returns the number of characters written and the first stream error, if
/// one ended the stream early. A failed write means the sink is gone
/// (closed pipe, user navigated away) — the stream is dropped quietly
/// rather than written to again.
pub async fn render_stream<S, W>(stream: S, out: &mut W) -> (usize, Option<anyhow::Error>)
where
    S: Stream<Item = Result<String>>,
    W: Write,
{
    futures::pin_mut!(stream);
    let mut written = 0;
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                let text = strip_markup(&chunk);
                if out.write_all(text.as_bytes()).is_err() {
                    return (written, None);
                }
                let _ = out.flush();
                written += text.chars().count();
            }
            Err(e) => return (written, Some(e)),
        }
    }
    (written, None)
}

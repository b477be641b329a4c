use crate::pixel::{EventsResponse, PixelEvent};
use crate::{Event, Orientation, StreamLinks};
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const PIXELSPORT_BASE: &str = "https://pixelsport.tv";
const EVENTS_PATH: &str = "/backend/liveTV/events";

/// Browser identity the origin (and the players replaying its streams) expects.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:144.0) Gecko/20100101 Firefox/144.0";
pub const REFERER: &str = "https://pixelsport.tv/";
pub const ICY_METADATA: &str = "1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Certificate handling for the events request.
///
/// The Pixelsport origin has historically served a certificate that does not
/// validate, so the binary opts into `AcceptInvalid`. The choice lives on the
/// client instance only; nothing process-wide is touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    #[default]
    Verify,
    AcceptInvalid,
}

/// Pixelsport live events client.
#[derive(Debug, Clone)]
pub struct PixelApi {
    client: Client,
    events_url: String,
    timeout: Duration,
    tls_policy: TlsPolicy,
}

#[derive(Debug, Clone)]
pub struct PixelApiBuilder {
    base_url: String,
    timeout: Duration,
    tls_policy: TlsPolicy,
}

impl Default for PixelApiBuilder {
    fn default() -> Self {
        Self {
            base_url: PIXELSPORT_BASE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            tls_policy: TlsPolicy::default(),
        }
    }
}

impl PixelApiBuilder {
    /// Scheme + host the events path is appended to. Mirrors and tests only.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tls_policy(mut self, tls_policy: TlsPolicy) -> Self {
        self.tls_policy = tls_policy;
        self
    }

    pub fn build(self) -> ApiResult<PixelApi> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(player_headers())
            .danger_accept_invalid_certs(self.tls_policy == TlsPolicy::AcceptInvalid)
            .build()
            .map_err(|e| ApiError::Other(format!("could not build HTTP client: {e}")))?;

        let events_url = format!("{}{EVENTS_PATH}", self.base_url.trim_end_matches('/'));

        Ok(PixelApi {
            client,
            events_url,
            timeout: self.timeout,
            tls_policy: self.tls_policy,
        })
    }
}

/// Headers sent alongside the user agent on every request.
fn player_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(
        HeaderName::from_static("icy-metadata"),
        HeaderValue::from_static(ICY_METADATA),
    );
    headers
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    Io(std::io::Error, String),
    Other(String),
}

impl ApiError {
    /// Connection, timeout and HTTP status failures, as opposed to anything
    /// that went wrong after a response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(..) | ApiError::Api(..))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, source) => write!(f, "Parse error for {source}: {e}"),
            ApiError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) => Some(e),
            ApiError::Io(e, _) => Some(e),
            ApiError::Parsing(..) | ApiError::Other(_) => None,
        }
    }
}

impl PixelApi {
    pub fn builder() -> PixelApiBuilder {
        PixelApiBuilder::default()
    }

    pub fn events_url(&self) -> &str {
        &self.events_url
    }

    pub fn tls_policy(&self) -> TlsPolicy {
        self.tls_policy
    }

    /// Fetch the current list of live events.
    ///
    /// Any transport failure or non-success status aborts the fetch. Inside a
    /// well-formed response, individual events are decoded best-effort.
    pub async fn fetch_events(&self) -> ApiResult<Vec<Event>> {
        let url = self.events_url.as_str();
        debug!("fetching live events from {url}");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        decode_events(&body).map_err(|e| ApiError::Parsing(e.to_string(), url.to_owned()))
    }
}

/// Read events from a local JSON snapshot with the same shape as the live feed.
pub fn load_events_file(path: &Path) -> ApiResult<Vec<Event>> {
    let display = path.display().to_string();
    debug!("loading live events from {display}");

    let content = std::fs::read_to_string(path).map_err(|e| ApiError::Io(e, display.clone()))?;
    decode_events(&content).map_err(|e| ApiError::Parsing(e.to_string(), display))
}

/// Decode a feed body. Fails only when the envelope itself is malformed.
pub fn decode_events(body: &str) -> Result<Vec<Event>, serde_json::Error> {
    let raw: EventsResponse = serde_json::from_str(body)?;
    Ok(map_events(raw.events.unwrap_or_default()))
}

// ---------------------------------------------------------------------------
// Mapping: Pixelsport wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_events(values: Vec<Value>) -> Vec<Event> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<PixelEvent>(value) {
            Ok(raw) => Some(map_event(raw)),
            Err(e) => {
                warn!("skipping malformed event #{index}: {e}");
                None
            }
        })
        .collect()
}

fn map_event(raw: PixelEvent) -> Event {
    let channel = raw.channel.unwrap_or_default();
    let category_name = channel.tv_category.and_then(|c| c.name);

    debug!(
        "event {}: {} vs {} ({})",
        raw.id.as_deref().unwrap_or("?"),
        raw.competitors1_name.as_deref().unwrap_or("TBA"),
        raw.competitors2_name.as_deref().unwrap_or("TBA"),
        category_name.as_deref().unwrap_or(Event::DEFAULT_CATEGORY),
    );

    Event {
        id: raw.id,
        name: raw.match_name,
        start_time: raw.date,
        orientation: raw
            .competitors1_home_away
            .as_deref()
            .map(Orientation::parse)
            .unwrap_or_default(),
        primary_logo: raw.competitors1_logo,
        category_name,
        stream_links: StreamLinks::new([
            channel.server1_url,
            channel.server2_url,
            channel.server3_url,
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"{
        "events": [
            {
                "id": 1,
                "match_name": "Team A vs Team B",
                "date": "2025-06-15T18:00:00Z",
                "competitors1_homeAway": "home",
                "competitors1_logo": "http://logo/a.png",
                "channel": {
                    "server1URL": "http://x/1.m3u8",
                    "server2URL": "http://x/2.m3u8",
                    "server3URL": "null",
                    "TVCategory": { "name": "NFL Week 1" }
                }
            },
            "garbage",
            { "match_name": "Bare Event" }
        ]
    }"#;

    #[test]
    fn decode_maps_wire_fields_to_domain() {
        let events = decode_events(SAMPLE_FEED).unwrap();
        let event = &events[0];
        assert_eq!(event.id.as_deref(), Some("1"));
        assert_eq!(event.title(), "Team A vs Team B");
        assert_eq!(event.start_time.as_deref(), Some("2025-06-15T18:00:00Z"));
        assert_eq!(event.orientation, Orientation::Home);
        assert_eq!(event.logo(), Some("http://logo/a.png"));
        assert_eq!(event.category(), "NFL Week 1");
        assert_eq!(event.stream_links.get(1), Some("http://x/1.m3u8"));
        assert_eq!(event.stream_links.get(3), Some("null"));
    }

    #[test]
    fn decode_skips_non_object_events_and_keeps_the_rest() {
        let events = decode_events(SAMPLE_FEED).unwrap();
        assert_eq!(events.len(), 2);

        let bare = &events[1];
        assert_eq!(bare.title(), "Bare Event");
        assert_eq!(bare.category(), "LIVE");
        assert_eq!(bare.orientation, Orientation::Unknown);
        assert_eq!(bare.stream_links, StreamLinks::default());
    }

    #[test]
    fn decode_treats_missing_or_null_events_as_empty() {
        assert!(decode_events("{}").unwrap().is_empty());
        assert!(decode_events(r#"{"events": null}"#).unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_malformed_envelope() {
        assert!(decode_events("not json").is_err());
        assert!(decode_events(r#"{"events": "nope"}"#).is_err());
    }

    #[test]
    fn builder_joins_base_url_and_events_path() {
        let api = PixelApi::builder()
            .base_url("http://mirror.local/")
            .build()
            .unwrap();
        assert_eq!(api.events_url(), "http://mirror.local/backend/liveTV/events");
        assert_eq!(api.tls_policy(), TlsPolicy::Verify);

        let api = PixelApi::builder().build().unwrap();
        assert_eq!(api.events_url(), "https://pixelsport.tv/backend/liveTV/events");
    }

    #[test]
    fn builder_accepts_scoped_insecure_tls() {
        let api = PixelApi::builder()
            .tls_policy(TlsPolicy::AcceptInvalid)
            .build()
            .unwrap();
        assert_eq!(api.tls_policy(), TlsPolicy::AcceptInvalid);
    }

    #[test]
    fn load_events_file_reports_missing_file_as_io() {
        let err = load_events_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ApiError::Io(..)));
        assert!(!err.is_transport());
    }

    // -----------------------------------------------------------------------
    // HTTP tests against a local mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_sends_player_headers_and_decodes_events() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/backend/liveTV/events")
            .match_header("user-agent", USER_AGENT)
            .match_header("referer", REFERER)
            .match_header("accept", "*/*")
            .match_header("accept-encoding", "identity")
            .match_header("icy-metadata", ICY_METADATA)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE_FEED)
            .create_async()
            .await;

        let api = PixelApi::builder().base_url(server.url()).build().unwrap();
        let events = api.fetch_events().await.unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].category(), "NFL Week 1");
    }

    #[tokio::test]
    async fn fetch_maps_error_status_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/backend/liveTV/events")
            .with_status(503)
            .create_async()
            .await;

        let api = PixelApi::builder().base_url(server.url()).build().unwrap();
        let err = api.fetch_events().await.unwrap_err();

        assert!(matches!(err, ApiError::Api(..)), "got {err}");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn fetch_maps_bad_json_to_parsing_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/backend/liveTV/events")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let api = PixelApi::builder().base_url(server.url()).build().unwrap();
        let err = api.fetch_events().await.unwrap_err();

        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn fetch_reports_unreachable_host_as_network_error() {
        let api = PixelApi::builder()
            .base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = api.fetch_events().await.unwrap_err();

        assert!(matches!(err, ApiError::Network(..)), "got {err}");
        assert!(err.is_transport());
    }
}

use std::thread;
use std::time::Duration;

use url::Url;

use crate::error::ScrapeError;

/// Root of the legacy site every page and relative asset reference hangs off.
pub const SITE_ROOT: &str = "https://www.calcuttayellowpages.com";

/// Fixed pause after each page, stylesheet and icon request.
pub const REQUEST_DELAY: Duration = Duration::from_millis(320);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("legacy-archive/", env!("CARGO_PKG_VERSION"));

/// Source of remote bytes.
///
/// The importer only ever issues plain GETs, one at a time.
pub trait Fetch {
    /// Fetch the body of `url`. Non-success statuses are errors.
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError>;

    /// Fetch the body of `url` as text.
    fn fetch_text(&self, url: &Url) -> Result<String, ScrapeError> {
        let bytes = self.fetch_bytes(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Wait out the request delay. No-op unless the source is rate sensitive.
    fn throttle(&self) {}
}

/// Blocking HTTP client for the legacy site.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    delay: Duration,
}

impl HttpClient {
    pub fn new() -> Result<Self, ScrapeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            delay: REQUEST_DELAY,
        })
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, ScrapeError> {
        log::debug!("GET {url}");
        let resp = self.http.get(url.as_str()).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }
}

impl Fetch for HttpClient {
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        let bytes = self.get(url)?.bytes()?;
        Ok(bytes.to_vec())
    }

    /// Decodes using the charset the server declares.
    fn fetch_text(&self, url: &Url) -> Result<String, ScrapeError> {
        Ok(self.get(url)?.text()?)
    }

    fn throttle(&self) {
        thread::sleep(self.delay);
    }
}

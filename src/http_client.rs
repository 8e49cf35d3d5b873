use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::config::Config;
use crate::error::FetchError;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The first caller's timeout wins; every call in
/// one process uses the same `Config` so that is not observable in practice.
pub fn http_client(config: &Config) -> Result<&'static Client, reqwest::Error> {
    CLIENT.get_or_try_init(|| Client::builder().timeout(config.request_timeout).build())
}

pub fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let resp = client.get(url).header(USER_AGENT, BROWSER_UA).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(resp.text()?)
}

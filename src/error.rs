use thiserror::Error;

/// The only failure that crosses the fetch boundary. Parse problems degrade
/// to empty results and scoring problems degrade to the `Invalid` sentinel,
/// so neither appears here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http status {0}")]
    Status(u16),
}

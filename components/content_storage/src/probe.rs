use playlist_primitives::AudioLocator;
use url::Url;

/// Outcome of a best-effort reachability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// The source answered (or needs no check)
    Reachable,
    /// The source answered with a non-success status
    Unavailable,
    /// The check itself failed; playback should be attempted anyway
    Unknown,
}

impl Reachability {
    /// Whether a playback attempt should proceed
    pub fn allows_playback(&self) -> bool {
        !matches!(self, Reachability::Unavailable)
    }
}

/// HEAD-check a song's playable locator.
///
/// Transient locators reference in-session data and are never probed
/// (a HEAD request against them is meaningless). For remote locators a
/// transport failure is not treated as gone: gateways commonly reject
/// HEAD while still serving GET, so the result is `Unknown` and the
/// caller proceeds.
pub async fn probe(client: &reqwest::Client, locator: &AudioLocator) -> Reachability {
    let url = match locator {
        AudioLocator::Transient(_) => return Reachability::Reachable,
        AudioLocator::Remote(url) => url,
    };

    if Url::parse(url).is_err() {
        tracing::warn!(%url, "unparseable audio locator");
        return Reachability::Unknown;
    }

    match client.head(url).send().await {
        Ok(response) if response.status().is_success() => Reachability::Reachable,
        Ok(response) => {
            tracing::warn!(%url, status = %response.status(), "audio source no longer available");
            Reachability::Unavailable
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "reachability probe failed, allowing playback attempt");
            Reachability::Unknown
        }
    }
}

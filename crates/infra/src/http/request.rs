//! URL and body helpers for outgoing requests

use fraplin_domain::FraplinError;
use reqwest::Body;
use serde::Serialize;
use url::Url;

/// Append path segments and query pairs to `base`.
///
/// Each segment is percent-encoded as a single path component, so
/// `Custom Field` becomes `Custom%20Field`. A segment containing `/` is
/// split into several components. A trailing slash on `base` is ignored.
///
/// # Errors
/// Returns `FraplinError::Config` when `base` cannot carry a path (for
/// example a `mailto:` URL).
pub fn resource_url<'a, S, K, V>(
    base: &Url,
    segments: S,
    query: &[(K, V)],
) -> Result<Url, FraplinError>
where
    S: IntoIterator<Item = &'a str>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| FraplinError::Config(format!("{base} cannot be used as a base URL")))?;
        path.pop_if_empty();
        for segment in segments {
            path.extend(segment.split('/').filter(|part| !part.is_empty()));
        }
    }

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key.as_ref(), value.as_ref());
        }
    }

    Ok(url)
}

/// Serialize `value` as a JSON request body.
///
/// # Errors
/// Returns `FraplinError::Internal` if `value` cannot be represented as JSON.
pub fn json_body<T: Serialize + ?Sized>(value: &T) -> Result<Body, FraplinError> {
    serde_json::to_vec(value)
        .map(Body::from)
        .map_err(|err| FraplinError::Internal(format!("failed to serialize request body: {err}")))
}

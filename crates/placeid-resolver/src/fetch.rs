//! Low-level HTTP helpers shared by the strategies.

use serde::de::DeserializeOwned;

use crate::error::ResolverError;

/// Builds a URL from a base, a path segment, and query pairs.
pub(crate) fn build_url(
    base: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<String, ResolverError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let mut url = reqwest::Url::parse(&joined).map_err(|e| ResolverError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;
    for (key, value) in query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url.to_string())
}

/// Fetch a text body with optional extra headers.
///
/// Non-2xx statuses are surfaced as [`ResolverError::UnexpectedStatus`] so
/// callers can log them with the offending URL.
pub(crate) async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<String, ResolverError> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ResolverError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}

/// Perform a GET and parse the body into `T`, tagging deserialization
/// failures with `context` for the logs.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    context: &str,
) -> Result<T, ResolverError> {
    let body = fetch_text(client, url, &[]).await?;
    serde_json::from_str::<T>(&body).map_err(|e| ResolverError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_base_and_path_and_encodes_query() {
        let url = build_url(
            "https://search.example.com/",
            "/search.naver",
            &[("query", "cafe bloom 서울")],
        )
        .unwrap();
        assert!(url.starts_with("https://search.example.com/search.naver?query="));
        assert!(!url.contains(' '), "query must be percent-encoded: {url}");
    }

    #[test]
    fn build_url_rejects_garbage_base() {
        let result = build_url("not a url", "p", &[]);
        assert!(matches!(result, Err(ResolverError::InvalidUrl { .. })));
    }
}

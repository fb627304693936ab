use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Build the default header set for an orchestrator API token.
///
/// Both the portal and the REST v2 surface accept `Authorization: Token {token}`.
/// The header value is flagged sensitive so it never shows up in debug output.
pub fn token_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Token {}", token.expose_secret())).map_err(
        |e| Error::Authentication {
            message: format!("invalid API token header value: {e}"),
        },
    )?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Normalize an orchestrator base URL and append `suffix` as a directory path.
///
/// `https://vco.example.net` and `https://vco.example.net/` both become
/// `https://vco.example.net/{suffix}/`.
pub(crate) fn join_base(base: &url::Url, suffix: &str) -> url::Url {
    let mut url = base.clone();
    let path = url.path().trim_end_matches('/').to_owned();
    let suffix = suffix.trim_matches('/');
    url.set_path(&format!("{path}/{suffix}/"));
    url.set_query(None);
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_header_uses_token_scheme() {
        let headers = token_headers(&SecretString::from("abc123".to_owned())).unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Token abc123");
    }

    #[test]
    fn token_header_rejects_control_characters() {
        let result = token_headers(&SecretString::from("bad\ntoken".to_owned()));
        assert!(matches!(result, Err(Error::Authentication { .. })));
    }

    #[test]
    fn join_base_handles_trailing_slash() {
        let a = join_base(&"https://vco.example.net".parse().unwrap(), "portal");
        let b = join_base(&"https://vco.example.net/".parse().unwrap(), "/portal/");
        assert_eq!(a.as_str(), "https://vco.example.net/portal/");
        assert_eq!(a, b);
    }
}

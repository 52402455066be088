use async_trait::async_trait;
use log::debug;

use crate::error::SourceError;
use crate::record_decoder::RecordBytes;
use crate::source::RecordSource;

/// Reads the record from the `data` parameter of a dashboard URL, e.g.
/// `https://example.com/battery?data=102712345678901234010100aabbccdd`.
pub struct QueryParamSource {
    url: String,
}

impl QueryParamSource {
    pub const PARAM: &'static str = "data";

    /// `url` may be a full URL or just the query string.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The percent-decoded value of the first `data` parameter, whatever its length
    pub fn param_value(&self) -> Option<String> {
        query_value(&self.url, Self::PARAM)
    }
}

#[async_trait]
impl RecordSource for QueryParamSource {
    fn name(&self) -> &'static str {
        "url"
    }

    async fn read_payload(&mut self) -> Result<String, SourceError> {
        let value = self.param_value();
        debug!("URL: {} = {value:?}", Self::PARAM);

        // Anything shorter than a whole record is treated as absent
        match value {
            Some(value) if value.chars().count() >= RecordBytes::HEX_LEN => Ok(value),
            _ => Err(SourceError::MissingParameter { name: Self::PARAM }),
        }
    }
}

fn query_value(url: &str, key: &str) -> Option<String> {
    // The fragment may itself contain `?`, so it goes first
    let url = url.split('#').next().unwrap_or_default();
    let query = url.split_once('?').map_or(url, |(_, query)| query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| decode_component(k) == key)
        .map(|(_, v)| decode_component(v))
}

fn decode_component(component: &str) -> String {
    let component = component.replace('+', " ");
    match urlencoding::decode(&component) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => component.clone(),
    }
}

#[test]
fn test_query_value() {
    let url = "https://example.com/battery?foo=1&data=1027%41a&data=ffff#top";
    assert_eq!(query_value(url, "data"), Some("1027Aa".to_string()));
    assert_eq!(query_value(url, "foo"), Some("1".to_string()));
    assert_eq!(query_value(url, "bar"), None);
    assert_eq!(query_value("data=10", "data"), Some("10".to_string()));
    assert_eq!(query_value("https://example.com/battery", "data"), None);
    assert_eq!(query_value("?data", "data"), Some(String::new()));
}

#[test]
fn test_query_in_fragment_is_ignored() {
    let url = "https://example.com/battery#top?data=102712345678901234010100aabbccdd";
    assert_eq!(query_value(url, "data"), None);

    let url = "https://example.com/battery?data=ff#section?data=00";
    assert_eq!(query_value(url, "data"), Some("ff".to_string()));
}

#[tokio::test]
async fn test_read_payload() {
    let mut source =
        QueryParamSource::new("https://example.com/?data=102712345678901234010100AABBCCDDEE");
    assert_eq!(source.read_payload().await.unwrap(), "102712345678901234010100AABBCCDDEE");
}

#[tokio::test]
async fn test_short_or_missing_param_is_an_error() {
    let mut source = QueryParamSource::new("https://example.com/?data=1027");
    assert!(matches!(
        source.read_payload().await,
        Err(SourceError::MissingParameter { name: "data" })
    ));

    let mut source = QueryParamSource::new("https://example.com/");
    assert!(source.read_payload().await.is_err());

    let mut source = QueryParamSource::new(
        "https://example.com/battery#top?data=102712345678901234010100aabbccdd",
    );
    assert!(matches!(
        source.read_payload().await,
        Err(SourceError::MissingParameter { name: "data" })
    ));
}

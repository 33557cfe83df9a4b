//! Ordered query-parameter mapping.
//!
//! Caller-supplied parameters are kept as an insertion-ordered list of pairs
//! so that links can echo them back verbatim, repeated keys included.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

// Keeps filter syntax such as `organization_guid:1234;state:CREATED` or
// `a,b` readable.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':')
    .remove(b';')
    .remove(b'/')
    .remove(b',')
    .remove(b'@')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Decodes a raw `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Every pair is kept, in order, including
    /// repeated keys.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        raw.split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(segment), String::new()),
            })
            .collect()
    }

    /// Last value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value supplied for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Leaves exactly one `key`, at the position of its first occurrence.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut idx = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = idx <= first || *k != key;
                    idx += 1;
                    keep
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// Drops every occurrence of `key`, returning the last value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let last = self.get(key).map(str::to_string);
        self.pairs.retain(|(k, _)| k != key);
        last
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the pairs back into a query string, in order.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_COMPONENT),
                    utf8_percent_encode(value, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

// Form encoding writes spaces as `+`; everything else is percent-decoding.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_decodes() {
        let params = QueryParams::parse("?q=name%3Afoo&page=2&label=a+b");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("q", "name:foo"), ("page", "2"), ("label", "a b")]
        );
    }

    #[test]
    fn test_repeated_keys_are_all_kept() {
        let params = QueryParams::parse("q=organization_guid:1234&q=state:CREATED&page=3");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("q"), Some("state:CREATED"));
        assert_eq!(
            params.get_all("q").collect::<Vec<_>>(),
            vec!["organization_guid:1234", "state:CREATED"]
        );
        assert_eq!(
            params.to_query_string(),
            "q=organization_guid:1234&q=state:CREATED&page=3"
        );
    }

    #[test]
    fn test_set_collapses_repeated_key() {
        let mut params = QueryParams::parse("page=1&q=a&page=3&q=b");
        params.set("page", "2");
        assert_eq!(params.to_query_string(), "page=2&q=a&q=b");

        assert_eq!(params.remove("q"), Some("b".to_string()));
        assert_eq!(params.to_query_string(), "page=2");
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut params: QueryParams = [("q", "a"), ("page", "1")].into_iter().collect();
        params.set("page", "2");
        params.set("results-per-page", "10");
        assert_eq!(params.to_query_string(), "q=a&page=2&results-per-page=10");
    }

    #[test]
    fn test_encoding_keeps_filter_syntax_readable() {
        let params: QueryParams = [("q", "organization_guid:1234"), ("names", "a b&c")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_query_string(),
            "q=organization_guid:1234&names=a%20b%26c"
        );
    }

    #[test]
    fn test_chained_filters_round_trip() {
        let raw = "q=organization_guid:1234;state:CREATED&label=a%3Db";
        let params = QueryParams::parse(raw);
        assert_eq!(params.get("q"), Some("organization_guid:1234;state:CREATED"));
        assert_eq!(params.get("label"), Some("a=b"));
        assert_eq!(params.to_query_string(), raw);
    }

    #[test]
    fn test_malformed_percent_is_kept_literally() {
        let params = QueryParams::parse("q=100%&x=%zz");
        assert_eq!(params.get("q"), Some("100%"));
        assert_eq!(params.get("x"), Some("%zz"));
    }

    #[test]
    fn test_key_without_value() {
        let mut params = QueryParams::parse("orphan-relations&page=1");
        assert!(params.contains("orphan-relations"));
        assert_eq!(params.get("orphan-relations"), Some(""));
        assert_eq!(params.remove("page"), Some("1".to_string()));
        assert_eq!(params.len(), 1);
    }
}

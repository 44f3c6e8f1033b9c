//! Decoded query parameters and their canonical encoding.

use std::collections::BTreeMap;

use url::form_urlencoded;

pub(crate) const QUERY: &str = "q";
pub(crate) const RANGE_TYPE: &str = "rangetype";
pub(crate) const FROM: &str = "from";
pub(crate) const TO: &str = "to";
pub(crate) const RELATIVE: &str = "relative";
pub(crate) const KEYWORD: &str = "keyword";
pub(crate) const FIELDS: &str = "fields";

/// Parameter name → value mapping with unique keys.
///
/// Iteration and encoding are in sorted key order, so equal mappings always
/// serialize to the same query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    inner: BTreeMap<String, String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string (no leading `?`).
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn from_query(query: &str) -> Self {
        let inner = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect::<BTreeMap<_, _>>();
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes to a query string: space as `+`, reserved characters percent-escaped.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl FromIterator<(String, String)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_sorts_keys_and_escapes() {
        let mut p = SearchParams::new();
        p.set(RANGE_TYPE, "keyword");
        p.set(QUERY, "level:\"error\" AND a&b=c");
        p.set(KEYWORD, "last week");
        assert_eq!(
            p.encode(),
            "keyword=last+week&q=level%3A%22error%22+AND+a%26b%3Dc&rangetype=keyword"
        );
    }

    #[test]
    fn encode_empty() {
        assert_eq!(SearchParams::new().encode(), "");
    }

    #[test]
    fn empty_value_is_kept() {
        let mut p = SearchParams::new();
        p.set(FIELDS, "");
        assert_eq!(p.encode(), "fields=");
        assert_eq!(SearchParams::from_query("fields=").get(FIELDS), Some(""));
    }

    #[test]
    fn set_replaces_and_remove_returns_value() {
        let mut p = SearchParams::new();
        p.set(RELATIVE, "60");
        p.set(RELATIVE, "300");
        assert_eq!(p.len(), 1);
        assert_eq!(p.remove(RELATIVE).as_deref(), Some("300"));
        assert!(p.is_empty());
        assert_eq!(p.remove(RELATIVE), None);
    }

    #[test]
    fn from_query_decodes_plus_and_percent() {
        let p = SearchParams::from_query("q=disk+full%21&from=2020-01-01T00%3A00%3A00.000Z");
        assert_eq!(p.get(QUERY), Some("disk full!"));
        assert_eq!(p.get(FROM), Some("2020-01-01T00:00:00.000Z"));
        assert!(!p.contains(TO));
    }

    proptest! {
        #[test]
        fn prop_encode_decode_recovers_mapping(
            pairs in proptest::collection::btree_map("[a-z]{1,8}", "\\PC{0,24}", 0..8),
        ) {
            let params: SearchParams = pairs.clone().into_iter().collect();
            let decoded = SearchParams::from_query(&params.encode());
            prop_assert_eq!(decoded, params);
        }
    }
}

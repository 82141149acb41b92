use crate::multi_map::MultiMap;

/// Request headers, keyed by lowercase name.
#[derive(Debug)]
pub struct Headers(MultiMap<String, String>);

impl Headers {
    pub fn new(mm: MultiMap<String, String>) -> Self {
        Self(mm)
    }

    pub fn new_empty() -> Self {
        Self(MultiMap::new_empty())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get_first(key.to_lowercase().as_str())
            .map(|s| s.as_str())
    }

    /// Every comma-separated token of every occurrence of `key`.
    pub fn get_iter(&self, key: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.0.get_all(key.to_lowercase().as_str()).map(|values| {
            values
                .iter()
                .flat_map(|v| v.split(','))
                .map(|token| token.trim())
        })
    }

    pub fn get_connection(&self) -> Option<impl Iterator<Item = &str> + '_> {
        self.get_iter("connection")
    }

    pub fn get_content_length(&self) -> anyhow::Result<Option<usize>> {
        match self.get("content-length").map(|length| length.parse::<usize>()) {
            Some(Ok(length)) => Ok(Some(length)),
            Some(Err(err)) => Err(err)?,
            None => Ok(None),
        }
    }

    /// The media type of the body, without parameters such as `charset`.
    pub fn get_content_type(&self) -> Option<&str> {
        self.get("content-type")
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim())
    }
}

#[cfg(test)]
mod tests {
    use crate::multi_map::MultiMap;

    use super::Headers;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        Headers::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<MultiMap<_, _>>(),
        )
    }

    #[test]
    fn test_get_case_insensitive() {
        let h = headers(&[("user-agent", "curl/8.0")]);
        assert_eq!(h.get("User-Agent"), Some("curl/8.0"));
    }

    #[test]
    fn test_get_connection() {
        let h = headers(&[("connection", "keep-alive, Upgrade"), ("connection", "close")]);
        let got: Vec<_> = h.get_connection().unwrap().collect();
        assert_eq!(got, ["keep-alive", "Upgrade", "close"]);
    }

    #[test]
    fn test_get_content_length() {
        assert_eq!(
            headers(&[("content-length", "12")])
                .get_content_length()
                .unwrap(),
            Some(12)
        );
        assert_eq!(Headers::new_empty().get_content_length().unwrap(), None);
        assert!(headers(&[("content-length", "x")])
            .get_content_length()
            .is_err());
    }

    #[test]
    fn test_get_content_type() {
        let h = headers(&[(
            "content-type",
            "application/x-www-form-urlencoded; charset=utf-8",
        )]);
        assert_eq!(
            h.get_content_type(),
            Some("application/x-www-form-urlencoded")
        );
    }
}

/// String identifier attached to pickable scene entities.
///
/// Region solids are tagged `area_<code>` and their paired border outlines
/// `line_<code>`; the shared numeric suffix is the only association between
/// the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    pub fn area(code: u64) -> Self {
        Tag(format!("area_{code}"))
    }

    pub fn line(code: u64) -> Self {
        Tag(format!("line_{code}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric code after the last `_`, if present and well-formed.
    pub fn code(&self) -> Option<u64> {
        self.0.rsplit('_').next()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Tag;

    #[test]
    fn area_and_line_tags_share_the_code_suffix() {
        let area = Tag::area(320600);
        let line = Tag::line(320600);
        assert_eq!(area.as_str(), "area_320600");
        assert_eq!(line.as_str(), "line_320600");
        assert_eq!(area.code(), Some(320600));
        assert_eq!(line.code(), Some(320600));
    }

    #[test]
    fn malformed_suffix_has_no_code() {
        assert_eq!(Tag("ground".to_string()).code(), None);
        assert_eq!(Tag("area_".to_string()).code(), None);
    }
}

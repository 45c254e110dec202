/// A normalized adapter GUID, held in canonical braced form.
///
/// Derived once from raw user input and reused across every catalog
/// location of a pass. All comparisons against store content are
/// case-insensitive and literal — the token is never interpreted as a
/// pattern, whatever characters it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidToken {
    braced: String,
    lower: String,
}

impl GuidToken {
    /// Normalize a raw user-supplied GUID string: trim whitespace and wrap
    /// in `{...}` unless already braced. Returns None for input that is
    /// empty after trimming.
    pub fn normalize(raw: &str) -> Option<GuidToken> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let braced = if trimmed.starts_with('{') && trimmed.ends_with('}') {
            trimmed.to_string()
        } else {
            format!("{{{trimmed}}}")
        };
        let lower = braced.to_ascii_lowercase();
        Some(GuidToken { braced, lower })
    }

    /// The canonical `{...}` form.
    pub fn braced(&self) -> &str {
        &self.braced
    }

    /// The GUID without surrounding braces.
    pub fn bare(&self) -> &str {
        self.braced
            .trim_start_matches('{')
            .trim_end_matches('}')
    }

    /// Case-insensitive exact equality against a stored value.
    pub fn matches_exact(&self, value: &str) -> bool {
        value.eq_ignore_ascii_case(&self.braced)
    }

    /// Case-insensitive literal containment, for values that decorate the
    /// GUID (e.g. `\Device\{...}` linkage entries).
    pub fn contained_in(&self, value: &str) -> bool {
        value.to_ascii_lowercase().contains(&self.lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_input_gets_braced() {
        let t = GuidToken::normalize("1234ABCD-0000-0000-0000-000000000001").unwrap();
        assert_eq!(t.braced(), "{1234ABCD-0000-0000-0000-000000000001}");
        assert_eq!(t.bare(), "1234ABCD-0000-0000-0000-000000000001");
    }

    #[test]
    fn braced_input_kept_as_is() {
        let t = GuidToken::normalize("  {AAAA-BBBB}  ").unwrap();
        assert_eq!(t.braced(), "{AAAA-BBBB}");
    }

    #[test]
    fn blank_input_rejected() {
        assert!(GuidToken::normalize("").is_none());
        assert!(GuidToken::normalize("   \t ").is_none());
    }

    #[test]
    fn exact_match_ignores_case() {
        let t = GuidToken::normalize("{1234abcd-0000}").unwrap();
        assert!(t.matches_exact("{1234ABCD-0000}"));
        assert!(!t.matches_exact("{1234ABCD-0001}"));
        assert!(!t.matches_exact("1234abcd-0000"));
    }

    #[test]
    fn containment_is_literal_and_case_insensitive() {
        let t = GuidToken::normalize("1234ABCD-0000").unwrap();
        assert!(t.contained_in(r"\Device\{1234abcd-0000}"));
        // The braces must appear literally in the stored value.
        assert!(!t.contained_in(r"\Device\1234abcd-0000"));
    }
}

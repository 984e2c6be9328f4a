/// Checks if `candidate` is a proper subdomain of `base`
///
/// The candidate must end with `base` on a label boundary and carry at
/// least one additional label:
///
/// - `cs.example.org` is a subdomain of `example.org`
/// - `a.b.example.org` is a subdomain of `example.org`
/// - `example.org` is NOT a subdomain of itself
/// - `notexample.org` is NOT a subdomain of `example.org`
///
/// Both arguments are expected to be lowercase hostnames.
///
/// # Examples
///
/// ```
/// use site_census::url::is_subdomain_of;
///
/// assert!(is_subdomain_of("blog.example.com", "example.com"));
/// assert!(!is_subdomain_of("example.com", "example.com"));
/// assert!(!is_subdomain_of("myexample.com", "example.com"));
/// ```
pub fn is_subdomain_of(candidate: &str, base: &str) -> bool {
    if base.is_empty() || candidate.len() <= base.len() + 1 {
        return false;
    }

    candidate
        .strip_suffix(base)
        .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_subdomain() {
        assert!(is_subdomain_of("blog.example.com", "example.com"));
        assert!(is_subdomain_of("sub.test.com", "test.com"));
    }

    #[test]
    fn test_nested_subdomains() {
        assert!(is_subdomain_of("api.v2.example.com", "example.com"));
        assert!(is_subdomain_of("deep.nested.sub.example.com", "example.com"));
    }

    #[test]
    fn test_same_domain_is_not_subdomain() {
        assert!(!is_subdomain_of("example.com", "example.com"));
    }

    #[test]
    fn test_no_match_partial_label() {
        assert!(!is_subdomain_of("myexample.com", "example.com"));
        assert!(!is_subdomain_of("notexample.com", "example.com"));
    }

    #[test]
    fn test_no_match_different_domain() {
        assert!(!is_subdomain_of("example.org", "example.com"));
        assert!(!is_subdomain_of("example.com.org", "example.com"));
    }

    #[test]
    fn test_parent_is_not_subdomain_of_child() {
        assert!(!is_subdomain_of("example.com", "www.example.com"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!is_subdomain_of("", "example.com"));
        assert!(!is_subdomain_of("example.com", ""));
        assert!(!is_subdomain_of("", ""));
        assert!(!is_subdomain_of(".example.com", "example.com"));
    }

    #[test]
    fn test_multiple_dots_in_base() {
        assert!(is_subdomain_of("example.co.uk", "co.uk"));
        assert!(is_subdomain_of("blog.example.co.uk", "example.co.uk"));
        assert!(!is_subdomain_of("example.co.jp", "example.co.uk"));
    }
}

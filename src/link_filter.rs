use url::Url;

/// A link counts as relative only when it starts with `/` or `.`. This is a
/// syntactic heuristic: bare words like `two` are left untouched and get
/// rejected at the scheme check instead.
pub fn is_relative_link(link: &str) -> bool {
    link.starts_with('/') || link.starts_with('.')
}

/// Relative links are joined against the crawl root; anything else must
/// parse as an absolute URL on its own. Unparseable input is `None`, never
/// an error.
pub fn resolve(root: &Url, link: &str) -> Option<Url> {
    if is_relative_link(link) {
        root.join(link).ok()
    } else {
        Url::parse(link).ok()
    }
}

pub fn is_crawlable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Host and port only, no subdomain matching. The scheme is deliberately
/// left out so an `http://` link on an `https://` root still counts as
/// in-domain.
pub fn is_same_domain(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("https://test.com/").unwrap()
    }

    #[test]
    fn is_relative_link_matches_paths_and_dot_segments() {
        assert!(is_relative_link("/about/"));
        assert!(is_relative_link("../team/"));
        assert!(is_relative_link("./careers"));
        assert!(!is_relative_link("https://facebook.com"));
        assert!(!is_relative_link("https://community.test.com"));
        assert!(!is_relative_link("two"));
        assert!(!is_relative_link("?query"));
        assert!(!is_relative_link("#"));
    }

    #[test]
    fn resolve_joins_relative_links_against_the_root() {
        assert_eq!(
            resolve(&root(), "/about/").unwrap().as_str(),
            "https://test.com/about/"
        );
        assert_eq!(
            resolve(&root(), "../team/").unwrap().as_str(),
            "https://test.com/team/"
        );
        assert_eq!(
            resolve(&root(), "./careers").unwrap().as_str(),
            "https://test.com/careers"
        );
        // scheme-relative links resolve to a different host
        assert_eq!(
            resolve(&root(), "//cdn.test.com/lib.js").unwrap().as_str(),
            "https://cdn.test.com/lib.js"
        );
    }

    #[test]
    fn resolve_passes_absolute_links_through() {
        assert_eq!(
            resolve(&root(), "https://test.com/about/").unwrap().as_str(),
            "https://test.com/about/"
        );
        assert_eq!(
            resolve(&root(), "mailto:foo@bar.com").unwrap().scheme(),
            "mailto"
        );
    }

    #[test]
    fn resolve_drops_unparseable_links() {
        assert_eq!(resolve(&root(), "two"), None);
        assert_eq!(resolve(&root(), "?query"), None);
        assert_eq!(resolve(&root(), "#"), None);
        assert_eq!(resolve(&root(), "#button"), None);
    }

    #[test]
    fn is_crawlable_accepts_http_and_https_only() {
        assert!(is_crawlable(&Url::parse("https://test.com/").unwrap()));
        assert!(is_crawlable(&Url::parse("http://test.com/about/us").unwrap()));
        assert!(!is_crawlable(&Url::parse("javascript:void(0)").unwrap()));
        assert!(!is_crawlable(&Url::parse("mailto:foo@bar.com").unwrap()));
        assert!(!is_crawlable(&Url::parse("ftp://test.com/file").unwrap()));
    }

    #[test]
    fn is_same_domain_requires_exact_host_and_port() {
        let base = root();
        assert!(is_same_domain(
            &Url::parse("https://test.com/about/").unwrap(),
            &base
        ));
        assert!(is_same_domain(
            &Url::parse("http://test.com/about/team").unwrap(),
            &base
        ));
        assert!(!is_same_domain(
            &Url::parse("https://facebook.com").unwrap(),
            &base
        ));
        assert!(!is_same_domain(
            &Url::parse("https://community.test.com").unwrap(),
            &base
        ));
        assert!(!is_same_domain(
            &Url::parse("https://test.com:8443/").unwrap(),
            &base
        ));
    }
}

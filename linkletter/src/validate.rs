use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Returns true if the input parses as an absolute URL.
pub fn is_url(text: &str) -> bool {
    Url::parse(text).is_ok()
}

/// Loose mailbox@domain.tld shape check, nothing RFC-grade.
pub fn is_email(text: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    }
    RE.is_match(text)
}

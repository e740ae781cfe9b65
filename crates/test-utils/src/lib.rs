//! Tessera test utilities.
//!
//! Helpers for integration testing: scraping rendered forms the way a
//! browser would see them, so tests can build realistic submissions.

use regex::Regex;

/// Wire name of the hidden token field.
pub const TOKEN_NAME: &str = "tessera_form_id";

/// Wire name of the anti-spam answer field.
pub const ANTI_SPAM_NAME: &str = "tessera_anti_spam";

/// Value of the hidden input with the given wire name.
pub fn extract_hidden_value(html: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r#"name="{}" value="([^"]*)" type="hidden""#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|caps| caps[1].to_string())
}

/// Encoded validation token embedded in a rendered form.
pub fn extract_token(html: &str) -> Option<String> {
    extract_hidden_value(html, TOKEN_NAME)
}

/// Number of token fields in a rendered form.
pub fn count_tokens(html: &str) -> usize {
    html.matches(&format!(r#"name="{TOKEN_NAME}""#)).count()
}

/// Wire names of controls carrying the `required` class, in document order
/// and without duplicates.
pub fn required_field_names(html: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r#"class="(?:[^"]*\s)?required(?:\s[^"]*)?"[^>]*?\sname="([^"]+)""#)
    else {
        return Vec::new();
    };

    let mut names: Vec<String> = Vec::new();
    for caps in re.captures_iter(html) {
        let name = &caps[1];
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Answer to the displayed `a + b = ?` question, if the form shows one.
pub fn solve_challenge(html: &str) -> Option<String> {
    let re = Regex::new(r"(\d+) \+ (\d+) = \?").ok()?;
    let caps = re.captures(html)?;
    let left: u64 = caps[1].parse().ok()?;
    let right: u64 = caps[2].parse().ok()?;
    Some((left + right).to_string())
}

/// Percent-encode name/value pairs as an `application/x-www-form-urlencoded`
/// body.
pub fn urlencode(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

//! Tag strings and machine tags.
//!
//! Tags arrive as comma-delimited strings (`"indieweb, notes, tweet"`).
//! Machine tags carry structured data as `namespace:predicate=value`; the
//! `auth` namespace grants access rights:
//!
//! - `auth:private=example.com`: the post is private, and `example.com` may
//!   view it. Several `auth:private` tags are additive.
//! - `auth:editable=example.com`: `example.com` may edit (and so view) the
//!   post. Editors cannot change `auth` tags; that, and any super-admin role,
//!   is left to the outer authorization code.

use std::fmt;

/// Split a comma-delimited tag string into trimmed, non-empty tags.
#[must_use]
pub fn tagstring_to_vec(tagstring: &str) -> Vec<String> {
    tagstring
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalise a tag string: `" a ,b,, c "` becomes `"a,b,c"`.
#[must_use]
pub fn tagstring_clean(tagstring: &str) -> String {
    tagstring_to_vec(tagstring).join(",")
}

/// A `namespace:predicate=value` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineTag {
    pub namespace: String,
    pub predicate: String,
    pub value: String,
}

impl MachineTag {
    /// Parse a machine tag. Namespace and predicate must be non-empty runs of
    /// ASCII alphanumerics, `-` or `_`; the value may be anything.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let (namespace, rest) = tag.trim().split_once(':')?;
        let (predicate, value) = rest.split_once('=')?;
        if !is_identifier(namespace) || !is_identifier(predicate) {
            return None;
        }
        Some(Self {
            namespace: namespace.to_string(),
            predicate: predicate.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for MachineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.namespace, self.predicate, self.value)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Access rules collected from `auth:*` machine tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthTags {
    /// Domains allowed to view a private post.
    pub private: Vec<String>,
    /// Domains allowed to edit the post.
    pub editable: Vec<String>,
}

impl AuthTags {
    /// Whether any `auth:private` tag was present.
    #[must_use]
    pub fn is_private(&self) -> bool {
        !self.private.is_empty()
    }

    #[must_use]
    pub fn can_view(&self, domain: &str) -> bool {
        !self.is_private() || contains_domain(&self.private, domain) || self.can_edit(domain)
    }

    #[must_use]
    pub fn can_edit(&self, domain: &str) -> bool {
        contains_domain(&self.editable, domain)
    }
}

fn contains_domain(domains: &[String], domain: &str) -> bool {
    domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
}

/// Collect `auth:private` and `auth:editable` tags. Other `auth` keywords and
/// non-machine tags are ignored.
#[must_use]
pub fn auth_tags<S: AsRef<str>>(tags: &[S]) -> AuthTags {
    let mut auth = AuthTags::default();

    for tag in tags.iter().filter_map(|tag| MachineTag::parse(tag.as_ref())) {
        if !tag.namespace.eq_ignore_ascii_case("auth") || tag.value.is_empty() {
            continue;
        }
        match tag.predicate.as_str() {
            "private" => auth.private.push(tag.value),
            "editable" => auth.editable.push(tag.value),
            _ => {}
        }
    }

    auth
}

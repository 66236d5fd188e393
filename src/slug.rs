//! Heading anchor ids.
//!
//! [`Slugger`] hands out ids that are unique within one document. It is
//! owned by the per-call render context, so two renders of the same input
//! always produce the same ids.

use std::collections::HashSet;

/// Id used when a heading has no characters that survive slugging.
const EMPTY_SLUG: &str = "section";

/// Turn heading text into a URL-safe id.
///
/// Lower-cases, turns every character outside `[a-z0-9_-]` into `-`,
/// collapses runs of `-` and trims them from both ends.
///
/// ```
/// use gfm_render::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("snake_case stays"), "snake_case-stays");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            c
        } else {
            '-'
        };
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Registry of issued heading ids for a single render.
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    issued: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `raw` and make it unique among the ids issued so far.
    ///
    /// The first occurrence keeps the bare slug; later ones get the smallest
    /// free `-N` suffix.
    pub fn slug(&mut self, raw: &str) -> String {
        let mut base = slugify(raw);
        if base.is_empty() {
            base = EMPTY_SLUG.to_string();
        }

        if self.issued.insert(base.clone()) {
            return base;
        }

        let mut n = 1usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

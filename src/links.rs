//! Link and media URL resolution.
//!
//! Links fail open: a URL that cannot be resolved is kept as written.
//! Media fail closed: the `src` is dropped rather than pointed somewhere
//! unintended.

use url::Url;

/// `rel` value carried by every link that leaves the page.
pub const EXTERNAL_REL: &str = "noopener noreferrer";

/// Whether `href` points inside the current page.
pub fn is_anchor(href: &str) -> bool {
    href.starts_with('#')
}

/// Whether `url` borrows the scheme of the embedding page (`//host/...`).
pub fn is_protocol_relative(url: &str) -> bool {
    let mut chars = url.trim_start().chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('/' | '\\'), Some('/' | '\\'))
    )
}

/// Resolve a link target against `base`.
///
/// Anchors, protocol-relative targets, and anything that fails to resolve
/// come back unchanged.
pub fn resolve_link(href: &str, base: Option<&str>) -> String {
    if is_anchor(href) || is_protocol_relative(href) {
        return href.to_string();
    }
    let Some(base) = base else {
        return href.to_string();
    };
    match join(base, href) {
        Some(resolved) => resolved,
        None => {
            tracing::debug!(href, base, "link did not resolve against base; keeping it");
            href.to_string()
        }
    }
}

/// Resolve an image or video source against `base`.
///
/// Returns `None` when the source must be omitted: it is protocol-relative,
/// or a base is configured and resolution fails.
pub fn resolve_media(src: &str, base: Option<&str>) -> Option<String> {
    if is_protocol_relative(src) {
        return None;
    }
    match base {
        None => Some(src.to_string()),
        Some(base) => {
            let resolved = join(base, src);
            if resolved.is_none() {
                tracing::debug!(src, base, "media source did not resolve; dropping it");
            }
            resolved
        }
    }
}

fn join(base: &str, target: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(target).ok().map(String::from)
}

//! URI helpers.
//!
//! Source keys are usually relative (`test-cases/`) and only become URLs once a
//! public or storage prefix is put in front of them, so resolution has to work
//! on both relative keys and absolute URIs. Absolute bases go straight through
//! [`url::Url::join`]; relative ones are resolved under a private root and the
//! root is stripped again afterwards.

use url::Url;

/// Root used to resolve relative keys.
const RELATIVE_ROOT: &str = "relative:///";

/// True if `value` parses as an absolute URI (`https://…`, `s3://…`).
pub fn is_absolute(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Resolve `reference` against `base` the way a browser resolves a link.
///
/// ```
/// use hlsclip_common::uri::resolve;
///
/// assert_eq!(resolve("test-cases/", "playlist/a.m3u8"), "test-cases/playlist/a.m3u8");
/// assert_eq!(resolve("a/b/c.ts", "../d"), "a/d");
/// assert_eq!(resolve("s3://bucket/a/b.m3u8", "c.ts"), "s3://bucket/a/c.ts");
/// ```
pub fn resolve(base: &str, reference: &str) -> String {
    if let Ok(base_url) = Url::parse(base) {
        return match base_url.join(reference) {
            Ok(joined) => joined.to_string(),
            Err(_) => reference.to_string(),
        };
    }

    if is_absolute(reference) {
        return reference.to_string();
    }

    let joined = Url::parse(RELATIVE_ROOT)
        .and_then(|root| root.join(base))
        .and_then(|base_url| base_url.join(reference));

    match joined {
        Ok(url) => {
            let serialized = url.as_str();
            let path = serialized
                .strip_prefix(RELATIVE_ROOT)
                .unwrap_or(serialized);
            if base.starts_with('/') || reference.starts_with('/') {
                format!("/{path}")
            } else {
                path.to_string()
            }
        }
        Err(_) => reference.to_string(),
    }
}

/// Put `prefix` in front of a relative key. Absolute URIs are returned as-is.
pub fn prefixed(prefix: &str, key: &str) -> String {
    if is_absolute(key) {
        return key.to_string();
    }
    if prefix.ends_with('/') {
        format!("{prefix}{}", key.trim_start_matches('/'))
    } else {
        format!("{prefix}{key}")
    }
}

/// Swap a leading `from` prefix for `to`; other URIs are returned unchanged.
pub fn rebase(uri: &str, from: &str, to: &str) -> String {
    match uri.strip_prefix(from) {
        Some(rest) if !from.is_empty() => format!("{to}{rest}"),
        _ => uri.to_string(),
    }
}

/// Last path component of a URI.
pub fn file_name(uri: &str) -> &str {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    path.rsplit('/').next().unwrap_or(path)
}

/// Name of the directory holding the last path component, if any.
///
/// `playlist/270p_400k/playlist.m3u8` → `270p_400k`.
pub fn parent_name(uri: &str) -> Option<&str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let mut parts = path.rsplit('/');
    parts.next()?;
    parts.next().filter(|name| !name.is_empty())
}

/// Split a file name into stem and extension (extension keeps its dot).
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

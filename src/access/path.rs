use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Upper bound on nested percent-encoding layers peeled off by [`decode`]
const MAX_DECODE_ROUNDS: usize = 4;

/// Percent-decode a request path until it stops changing.
///
/// The result is only used to decide on a path, never forwarded. Nested
/// encodings (`%2564`) are peeled as well; invalid UTF-8 is replaced.
pub fn decode(path: &str) -> String {
    let mut current = path.to_string();
    for _ in 0..MAX_DECODE_ROUNDS {
        let decoded = match percent_decode_str(&current).decode_utf8_lossy() {
            Cow::Borrowed(_) => break,
            Cow::Owned(decoded) => decoded,
        };
        if decoded == current {
            break;
        }
        current = decoded;
    }
    current
}

/// Collapse `.` and `..` segments and repeated separators the way a POSIX
/// filesystem path normalizer does.
///
/// A leading `/` and a trailing `/` survive normalization. `..` segments that
/// climb past the root of an absolute path are dropped; on a relative path they
/// are kept. An empty input normalizes to `.`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last().copied() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if normalized.is_empty() && !absolute {
        normalized.push('.');
    }
    if trailing && !normalized.is_empty() {
        normalized.push('/');
    }
    if absolute {
        normalized.insert(0, '/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::{decode, normalize};

    #[test]
    fn decodes_escaped_characters() {
        assert_eq!(decode("/app/%64ev_tools"), "/app/dev_tools");
        assert_eq!(decode("/app%2Fdev_tools"), "/app/dev_tools");
        assert_eq!(decode("/bundles/app.js"), "/bundles/app.js");
    }

    #[test]
    fn decodes_nested_escapes() {
        assert_eq!(decode("/app/%2564ev_tools"), "/app/dev_tools");
    }

    #[test]
    fn malformed_escapes_are_left_alone() {
        assert_eq!(decode("/a%zz/b%"), "/a%zz/b%");
    }

    #[test]
    fn collapses_current_dir_segments() {
        assert_eq!(normalize("app/./././././dev_tools"), "app/dev_tools");
    }

    #[test]
    fn collapses_redundant_separators() {
        assert_eq!(normalize("//bundles///app//core.js"), "/bundles/app/core.js");
    }

    #[test]
    fn resolves_parent_segments() {
        assert_eq!(normalize("bundles/../app/dev_tools"), "app/dev_tools");
        assert_eq!(normalize("/app/kibana/../../app/dev_tools"), "/app/dev_tools");
    }

    #[test]
    fn parent_past_root() {
        assert_eq!(normalize("/../../app"), "/app");
        assert_eq!(normalize("../app"), "../app");
        assert_eq!(normalize("a/../../b"), "../b");
    }

    #[test]
    fn keeps_leading_and_trailing_separator() {
        assert_eq!(normalize("/bar/"), "/bar/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("bar/./"), "bar/");
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(normalize(""), ".");
        assert_eq!(normalize("."), ".");
        assert_eq!(normalize("a/.."), ".");
        assert_eq!(normalize("./"), "./");
    }
}

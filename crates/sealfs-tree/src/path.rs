//! Lexical path helpers.
//!
//! Paths are plain `/`-separated strings. Nothing here touches a real
//! filesystem.

use std::fmt::Write;

/// Returns the shortest path equivalent to `path` by purely lexical
/// processing.
///
/// Repeated separators collapse, `.` segments are dropped and `..`
/// removes the preceding segment. A `..` at the root stays at the root.
/// The empty path cleans to `"."`.
///
/// ```
/// use sealfs_tree::path::clean;
///
/// assert_eq!(clean("/mnt//usb/"), "/mnt/usb");
/// assert_eq!(clean("/a/./b/../c"), "/a/c");
/// assert_eq!(clean("/.."), "/");
/// assert_eq!(clean(""), ".");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Joins a parent path and a single segment.
///
/// An empty parent yields `name` unchanged, which is how a walk starts
/// at a mount root whose name is already absolute.
#[must_use]
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Splits immediately after the final separator.
///
/// ```
/// use sealfs_tree::path::split;
///
/// assert_eq!(split("/etc/accounts"), ("/etc/", "accounts"));
/// assert_eq!(split("/tmp"), ("/", "tmp"));
/// assert_eq!(split("/"), ("/", ""));
/// ```
#[must_use]
pub fn split(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..=i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Percent-escapes a single path segment.
///
/// ASCII alphanumerics, `-._~` and `$&+:=@` are kept; every other byte,
/// including `/`, becomes `%XX` with uppercase hex digits.
///
/// ```
/// use sealfs_tree::path::escape;
///
/// assert_eq!(escape("a b"), "a%20b");
/// assert_eq!(escape("x/y"), "x%2Fy");
/// assert_eq!(escape("user@host:1"), "user@host:1");
/// ```
#[must_use]
pub fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if keep(b) {
            out.push(char::from(b));
        } else {
            // writing to a String cannot fail
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

fn keep(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.' | b'_' | b'~' | b'$' | b'&' | b'+' | b':' | b'=' | b'@'
        )
}

/// Non-empty segments of an absolute path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_cases() {
        let cases = [
            ("/", "/"),
            ("//", "/"),
            ("/a/b/", "/a/b"),
            ("/a/../../b", "/b"),
            ("a/../..", ".."),
            ("a/./b", "a/b"),
            (".", "."),
            ("/mnt/usb", "/mnt/usb"),
        ];
        for (input, want) in cases {
            assert_eq!(clean(input), want, "clean({input:?})");
        }
    }

    #[test]
    fn join_cases() {
        assert_eq!(join("", "/"), "/");
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b"), "/a/b");
        assert_eq!(join("/mnt/usb", "x"), "/mnt/usb/x");
    }

    #[test]
    fn split_without_separator() {
        assert_eq!(split("file"), ("", "file"));
    }

    #[test]
    fn escape_reserved_in_segment() {
        assert_eq!(escape("a;b,c?d"), "a%3Bb%2Cc%3Fd");
        assert_eq!(escape("(x)!*'"), "%28x%29%21%2A%27");
        assert_eq!(escape("-._~$&+:=@"), "-._~$&+:=@");
    }

    #[test]
    fn escape_multibyte() {
        assert_eq!(escape("ä"), "%C3%A4");
    }

    #[test]
    fn segments_skip_empty() {
        let got: Vec<_> = segments("//a//b/").collect();
        assert_eq!(got, vec!["a", "b"]);
    }
}

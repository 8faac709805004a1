//! Markdown-to-text extraction.
//!
//! Turns one markdown file into a [`Document`]: a title pulled from front
//! matter (or the file stem), a cleaned plain-text body, and a canonical
//! URL derived from the file's path relative to the content root.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// One page of site content, ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    /// Plain text body. Empty when the page had no prose (the pipeline
    /// drops such documents).
    pub content: String,
    /// Canonical site path, always wrapped in `/`: `/posts/article/`.
    pub url: String,
}

/// Errors for a single file. These are soft: the pipeline logs them and
/// moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path {} is not under the content root", .0.display())]
    OutsideRoot(PathBuf),
}

static FRONT_MATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n(.*)\z").expect("malformed regex")
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^title:\s*["']?(.*?)["']?\s*$"#).expect("malformed regex")
});

static FENCED_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[\s\S]*?```").expect("malformed regex"));
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]+`").expect("malformed regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("malformed regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]+\)").expect("malformed regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("malformed regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("malformed regex"));
static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("malformed regex"));
static BOLD_UNDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_]+)__").expect("malformed regex"));
static ITALIC_UNDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([^_]+)_").expect("malformed regex"));
static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("malformed regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("malformed regex"));

/// Read one markdown file and produce its [`Document`].
///
/// Front matter, when present, supplies the title; otherwise the file stem
/// is used. The body is stripped down to plain text and the URL is derived
/// from the path relative to `root`.
pub fn extract_document(path: &Path, root: &Path) -> Result<Document, ExtractError> {
    let raw = std::fs::read_to_string(path)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (title, body) = match split_front_matter(&raw) {
        Some((front, body)) => (front_matter_title(front).unwrap_or(stem), body),
        None => (stem, raw.as_str()),
    };

    Ok(Document {
        title,
        content: clean_markdown(body),
        url: derive_url(path, root)?,
    })
}

/// Split a raw file into (front matter block, body), if the file starts
/// with a `---` delimited block.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    FRONT_MATTER_RE.captures(raw).map(|caps| {
        let front = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        (front, body)
    })
}

/// Pull the `title:` value out of a front matter block, stripping optional
/// surrounding quotes.
fn front_matter_title(front: &str) -> Option<String> {
    TITLE_RE
        .captures(front)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strip markdown and HTML markup from a body, leaving plain text with
/// single-space separation.
///
/// Pass order is load-bearing: code blocks go before emphasis so markers
/// inside code never match, and links go before images, so an image with
/// non-empty alt text degrades to `!alt`.
pub fn clean_markdown(body: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(body, "");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = HEADING_RE.replace_all(&text, "");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = BOLD_UNDER_RE.replace_all(&text, "$1");
    let text = ITALIC_UNDER_RE.replace_all(&text, "$1");
    let text = HTML_TAG_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Derive the canonical site URL for a content file.
///
/// Directory segments relative to the content root plus the file stem,
/// joined with `/` and wrapped in leading and trailing slashes:
/// `content/posts/article.md` -> `/posts/article/`.
fn derive_url(path: &Path, root: &Path) -> Result<String, ExtractError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ExtractError::OutsideRoot(path.to_path_buf()))?;

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut segments: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    segments.push(stem);

    Ok(format!("/{}/", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_title_double_quoted() {
        let raw = "---\ntitle: \"Hello World\"\n---\nbody";
        let (front, body) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter_title(front), Some("Hello World".to_string()));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_front_matter_title_single_quoted() {
        let raw = "---\ntitle: 'My Page'\ndate: 2024-01-01\n---\nbody";
        let (front, _) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter_title(front), Some("My Page".to_string()));
    }

    #[test]
    fn test_front_matter_title_unquoted() {
        let raw = "---\ndate: 2024-01-01\ntitle: Plain Title\n---\nbody";
        let (front, _) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter_title(front), Some("Plain Title".to_string()));
    }

    #[test]
    fn test_front_matter_without_title() {
        let raw = "---\ndate: 2024-01-01\n---\nbody";
        let (front, _) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter_title(front), None);
    }

    #[test]
    fn test_no_front_matter() {
        assert!(split_front_matter("just a body\nwith lines").is_none());
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        assert!(split_front_matter("---\ntitle: x\nno closing delimiter").is_none());
    }

    #[test]
    fn test_clean_removes_fenced_code() {
        let body = "before\n```rust\nlet x = *ptr;\n```\nafter";
        assert_eq!(clean_markdown(body), "before after");
    }

    #[test]
    fn test_clean_removes_inline_code() {
        assert_eq!(clean_markdown("run `cargo build` now"), "run now");
    }

    #[test]
    fn test_clean_keeps_link_text() {
        assert_eq!(
            clean_markdown("see [the docs](https://example.com/docs) here"),
            "see the docs here"
        );
    }

    #[test]
    fn test_clean_removes_empty_alt_image() {
        assert_eq!(clean_markdown("a ![](img.png) b"), "a b");
    }

    #[test]
    fn test_clean_image_with_alt_degrades_to_bang_alt() {
        // The link pass runs first and eats `[alt](url)`, leaving `!alt`.
        assert_eq!(clean_markdown("a ![photo](img.png) b"), "a !photo b");
    }

    #[test]
    fn test_clean_strips_headings() {
        assert_eq!(clean_markdown("# One\n## Two\ntext"), "One Two text");
    }

    #[test]
    fn test_clean_unwraps_emphasis() {
        assert_eq!(
            clean_markdown("**bold** *italic* __strong__ _em_"),
            "bold italic strong em"
        );
    }

    #[test]
    fn test_clean_strips_html_tags() {
        assert_eq!(
            clean_markdown("<div class=\"note\">kept text</div>"),
            "kept text"
        );
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_markdown("  a\n\n b\t\tc  "), "a b c");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let body = "# Title\n\nSome **bold** and [link](http://x) and `code`.";
        let once = clean_markdown(body);
        let twice = clean_markdown(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_preserves_non_ascii() {
        assert_eq!(
            clean_markdown("# Заголовок\nПривет, **мир**!"),
            "Заголовок Привет, мир!"
        );
    }

    #[test]
    fn test_derive_url_nested() {
        let url = derive_url(
            Path::new("content/posts/article.md"),
            Path::new("content"),
        )
        .unwrap();
        assert_eq!(url, "/posts/article/");
    }

    #[test]
    fn test_derive_url_root_level() {
        let url = derive_url(Path::new("content/about.md"), Path::new("content")).unwrap();
        assert_eq!(url, "/about/");
    }

    #[test]
    fn test_derive_url_deeply_nested() {
        let url = derive_url(
            Path::new("content/docs/guide/intro.md"),
            Path::new("content"),
        )
        .unwrap();
        assert_eq!(url, "/docs/guide/intro/");
    }

    #[test]
    fn test_derive_url_outside_root() {
        let result = derive_url(Path::new("elsewhere/post.md"), Path::new("content"));
        assert!(matches!(result, Err(ExtractError::OutsideRoot(_))));
    }

    #[test]
    fn test_url_shape_invariants() {
        for (path, root) in [
            ("content/posts/a.md", "content"),
            ("content/x.md", "content"),
            ("content/a/b/c/d.md", "content"),
        ] {
            let url = derive_url(Path::new(path), Path::new(root)).unwrap();
            assert!(url.starts_with('/'));
            assert!(url.ends_with('/'));
            assert!(!url.contains(".md"));
        }
    }
}

//! Manifest version declaration: lookup and targeted rewrite.
//!
//! The manifest is treated as opaque text. Only the value of the single
//! top-level `version:` line is ever touched; every other byte is preserved.

use std::fmt;
use std::ops::Range;

use regex::Regex;
use tracing::debug;

use crate::domain::Version;
use crate::error::{CommitBumpError, Result};

/// Default key label of the version declaration
pub const DEFAULT_VERSION_KEY: &str = "version";

/// Text content of a project manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    text: String,
}

impl ManifestDocument {
    pub fn new(text: impl Into<String>) -> Self {
        ManifestDocument { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ManifestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Location of the version declaration inside a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDeclaration {
    /// 1-based line number
    pub line_number: usize,
    /// Byte range of the value (quotes excluded)
    pub range: Range<usize>,
    /// The value text as written
    pub raw: String,
    /// Everything after `<key>:` up to the end of the line
    pub line_value: String,
    /// Why the line is unreadable when more than a value and a `#` comment follow the key
    pub malformed: Option<String>,
}

/// Splits the text after `<key>:` into the value range and, if the rest of
/// the line is not blank or a `#` comment, the reason it is malformed.
fn split_value(rest: &str) -> (Range<usize>, Option<String>) {
    let (range, after) = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => match rest[1..].find(quote) {
            Some(end) => (1..end + 1, &rest[end + 2..]),
            None => {
                return (
                    1..rest.trim_end().len(),
                    Some(format!("has no closing {} quote", quote)),
                )
            }
        },
        Some('#') | None => (0..0, rest),
        Some(_) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (0..end, &rest[end..])
        }
    };

    let after = after.trim();
    if after.is_empty() || after.starts_with('#') {
        (range, None)
    } else {
        (range, Some(format!("is followed by unexpected text '{}'", after)))
    }
}

/// Describes how the version is declared: `<key>: <value>` at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFormat {
    key: String,
}

impl Default for ManifestFormat {
    fn default() -> Self {
        ManifestFormat {
            key: DEFAULT_VERSION_KEY.to_string(),
        }
    }
}

impl ManifestFormat {
    /// Create a format for a custom key label
    ///
    /// # Errors
    /// * `Config` - if the key is empty or contains whitespace or `:`
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(CommitBumpError::config(format!(
                "Invalid version key '{}'",
                key
            )));
        }
        Ok(ManifestFormat { key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn declaration_regex(&self) -> Result<Regex> {
        // Column-0 only: indented `version:` keys belong to nested maps.
        let pattern = format!(
            r"(?m)^{}:[ \t]*(?P<rest>[^\r\n]*)",
            regex::escape(&self.key)
        );
        Regex::new(&pattern).map_err(|e| CommitBumpError::config(e.to_string()))
    }

    /// Finds the single version declaration line.
    ///
    /// # Errors
    /// * `ManifestParse` - if no line declares the key
    /// * `AmbiguousManifest` - if more than one line does
    pub fn locate(&self, manifest: &ManifestDocument) -> Result<VersionDeclaration> {
        let text = manifest.as_str();
        let re = self.declaration_regex()?;

        let mut found: Vec<VersionDeclaration> = re
            .captures_iter(text)
            .filter_map(|caps| caps.name("rest"))
            .map(|rest| {
                let (value, malformed) = split_value(rest.as_str());
                let range = rest.start() + value.start..rest.start() + value.end;
                VersionDeclaration {
                    line_number: text[..rest.start()].matches('\n').count() + 1,
                    raw: text[range.clone()].to_string(),
                    range,
                    line_value: rest.as_str().trim_end().to_string(),
                    malformed,
                }
            })
            .collect();

        match found.len() {
            0 => Err(CommitBumpError::ManifestParse {
                key: self.key.clone(),
            }),
            1 => {
                let declaration = found.remove(0);
                debug!(
                    line = declaration.line_number,
                    value = %declaration.raw,
                    "located version declaration"
                );
                Ok(declaration)
            }
            _ => Err(CommitBumpError::AmbiguousManifest {
                key: self.key.clone(),
                lines: found.iter().map(|d| d.line_number).collect(),
            }),
        }
    }

    fn parse_declaration(&self, declaration: &VersionDeclaration) -> Result<Version> {
        if let Some(reason) = &declaration.malformed {
            return Err(CommitBumpError::version_format(
                declaration.line_value.clone(),
                format!("{} (line {})", reason, declaration.line_number),
            ));
        }
        Version::parse(&declaration.raw).map_err(|err| match err {
            CommitBumpError::VersionFormat { text, reason } => CommitBumpError::VersionFormat {
                text,
                reason: format!("{} (line {})", reason, declaration.line_number),
            },
            other => other,
        })
    }

    /// Reads the currently declared version.
    pub fn read_version(&self, manifest: &ManifestDocument) -> Result<Version> {
        let declaration = self.locate(manifest)?;
        self.parse_declaration(&declaration)
    }

    /// Replaces the declared `old` version with `new`.
    ///
    /// The declaration is located and validated in full before any output is
    /// produced. When `old == new` the manifest is returned unchanged.
    ///
    /// # Errors
    /// * `ManifestParse`, `AmbiguousManifest` - see [`ManifestFormat::locate`]
    /// * `VersionFormat` - if the declared value is not a valid version
    /// * `VersionMismatch` - if the declared value is not `old`
    pub fn render(
        &self,
        manifest: &ManifestDocument,
        old: &Version,
        new: &Version,
    ) -> Result<ManifestDocument> {
        let declaration = self.locate(manifest)?;
        let declared = self.parse_declaration(&declaration)?;

        if declared != *old {
            return Err(CommitBumpError::VersionMismatch {
                expected: old.to_string(),
                found: declaration.raw,
            });
        }

        if old == new {
            return Ok(manifest.clone());
        }

        let text = manifest.as_str();
        let rendered = new.to_string();
        let mut out = String::with_capacity(text.len() + rendered.len());
        out.push_str(&text[..declaration.range.start]);
        out.push_str(&rendered);
        out.push_str(&text[declaration.range.end..]);

        Ok(ManifestDocument::new(out))
    }
}

/// [`ManifestFormat::render`] with the default `version` key.
pub fn render(manifest: &ManifestDocument, old: &Version, new: &Version) -> Result<ManifestDocument> {
    ManifestFormat::default().render(manifest, old, new)
}

/// [`ManifestFormat::read_version`] with the default `version` key.
pub fn read_version(manifest: &ManifestDocument) -> Result<Version> {
    ManifestFormat::default().read_version(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBSPEC: &str = "\
name: demo_app
description: A demo app.
# version: 0.0.1 is the first release
publish_to: 'none'

version: 1.0.0+1

environment:
  sdk: '>=3.0.0 <4.0.0'

dependencies:
  http:
    version: ^1.2.0
";

    #[test]
    fn test_locate_single_declaration() {
        let doc = ManifestDocument::new(PUBSPEC);
        let decl = ManifestFormat::default().locate(&doc).unwrap();
        assert_eq!(decl.line_number, 6);
        assert_eq!(decl.raw, "1.0.0+1");
        assert_eq!(&PUBSPEC[decl.range.clone()], "1.0.0+1");
    }

    #[test]
    fn test_read_version() {
        let doc = ManifestDocument::new(PUBSPEC);
        assert_eq!(read_version(&doc).unwrap(), Version::new(1, 0, 0, 1));
    }

    #[test]
    fn test_render_replaces_only_the_value() {
        let doc = ManifestDocument::new(PUBSPEC);
        let out = render(&doc, &Version::new(1, 0, 0, 1), &Version::new(1, 0, 1, 2)).unwrap();
        assert_eq!(
            out.as_str(),
            PUBSPEC.replace("version: 1.0.0+1\n", "version: 1.0.1+2\n")
        );
        assert!(out.as_str().contains("# version: 0.0.1 is the first release"));
        assert!(out.as_str().contains("    version: ^1.2.0"));
    }

    #[test]
    fn test_render_same_version_is_identity() {
        for text in [PUBSPEC, "version: 1.0.0\n", "version: \"2.3.4+9\" # pinned\r\n"] {
            let doc = ManifestDocument::new(text);
            let v = read_version(&doc).unwrap();
            assert_eq!(render(&doc, &v, &v).unwrap().as_str(), text);
        }
    }

    #[test]
    fn test_render_without_build_emits_explicit_build() {
        let doc = ManifestDocument::new("name: x\nversion: 1.2.3\n");
        let old = read_version(&doc).unwrap();
        let out = render(&doc, &old, &Version::new(1, 3, 0, 1)).unwrap();
        assert_eq!(out.as_str(), "name: x\nversion: 1.3.0+1\n");
    }

    #[test]
    fn test_render_preserves_quotes_comments_and_crlf() {
        let text = "name: x\r\nversion: '1.0.0+1'   # bumped by CI\r\nflutter:\r\n";
        let doc = ManifestDocument::new(text);
        let out = render(&doc, &Version::new(1, 0, 0, 1), &Version::new(2, 0, 0, 2)).unwrap();
        assert_eq!(
            out.as_str(),
            "name: x\r\nversion: '2.0.0+2'   # bumped by CI\r\nflutter:\r\n"
        );
    }

    #[test]
    fn test_render_last_line_without_newline() {
        let doc = ManifestDocument::new("name: x\nversion: 0.1.0+7");
        let out = render(&doc, &Version::new(0, 1, 0, 7), &Version::new(0, 1, 1, 8)).unwrap();
        assert_eq!(out.as_str(), "name: x\nversion: 0.1.1+8");
    }

    #[test]
    fn test_missing_declaration() {
        let doc = ManifestDocument::new("name: demo\ndescription: none\n");
        let err = read_version(&doc).unwrap_err();
        assert!(matches!(err, CommitBumpError::ManifestParse { ref key } if key == "version"));
    }

    #[test]
    fn test_indented_declaration_does_not_count() {
        let doc = ManifestDocument::new("dependencies:\n  version: 1.0.0\n");
        assert!(matches!(
            read_version(&doc),
            Err(CommitBumpError::ManifestParse { .. })
        ));
    }

    #[test]
    fn test_similar_keys_do_not_count() {
        let doc = ManifestDocument::new("versions: 1.0.0\nversion_code: 3\nversion: 1.0.0+1\n");
        assert_eq!(read_version(&doc).unwrap(), Version::new(1, 0, 0, 1));
    }

    #[test]
    fn test_ambiguous_declarations() {
        let doc = ManifestDocument::new("version: 1.0.0+1\nname: x\nversion: 1.0.1+2\n");
        match read_version(&doc) {
            Err(CommitBumpError::AmbiguousManifest { lines, .. }) => assert_eq!(lines, vec![1, 3]),
            other => panic!("expected AmbiguousManifest, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_version_reports_line() {
        let doc = ManifestDocument::new("name: x\nversion: 1.0\n");
        match read_version(&doc) {
            Err(CommitBumpError::VersionFormat { text, reason }) => {
                assert_eq!(text, "1.0");
                assert!(reason.contains("line 2"), "{}", reason);
            }
            other => panic!("expected VersionFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_is_format_error() {
        let doc = ManifestDocument::new("version:   # unset\n");
        assert!(matches!(
            read_version(&doc),
            Err(CommitBumpError::VersionFormat { .. })
        ));
    }

    #[test]
    fn test_text_after_value_is_format_error() {
        for (text, line_value) in [
            ("name: x\nversion: 1.0.0 +5\n", "1.0.0 +5"),
            ("name: x\nversion: 1.0.0+1 beta\n", "1.0.0+1 beta"),
            ("name: x\nversion: '1.0.0+1' beta # note\n", "'1.0.0+1' beta # note"),
            ("name: x\nversion: \"1.0.0+1\n", "\"1.0.0+1"),
        ] {
            let doc = ManifestDocument::new(text);
            match read_version(&doc) {
                Err(CommitBumpError::VersionFormat { text: found, reason }) => {
                    assert_eq!(found, line_value);
                    assert!(reason.contains("line 2"), "{}", reason);
                }
                other => panic!("expected VersionFormat for {:?}, got {:?}", text, other),
            }

            let err = render(&doc, &Version::new(1, 0, 0, 1), &Version::new(1, 0, 1, 2)).unwrap_err();
            assert!(matches!(err, CommitBumpError::VersionFormat { .. }), "{:?}", text);
        }
    }

    #[test]
    fn test_comment_after_value_is_allowed() {
        for text in [
            "version: 1.0.0+1 # note\n",
            "version: 1.0.0+1\t#note\n",
            "version: \"1.0.0+1\"   \n",
            "version: '1.0.0+1'# tight\n",
        ] {
            let doc = ManifestDocument::new(text);
            assert_eq!(read_version(&doc).unwrap(), Version::new(1, 0, 0, 1), "{:?}", text);
        }
    }

    #[test]
    fn test_render_rejects_stale_old_version() {
        let doc = ManifestDocument::new("version: 1.0.1+2\n");
        let err = render(&doc, &Version::new(1, 0, 0, 1), &Version::new(1, 0, 1, 2)).unwrap_err();
        assert!(matches!(err, CommitBumpError::VersionMismatch { .. }));
    }

    #[test]
    fn test_custom_key() {
        let format = ManifestFormat::new("appVersion").unwrap();
        let doc = ManifestDocument::new("version: 9.9.9\nappVersion: 0.2.0+5\n");
        assert_eq!(format.read_version(&doc).unwrap(), Version::new(0, 2, 0, 5));
        let out = format
            .render(&doc, &Version::new(0, 2, 0, 5), &Version::new(0, 3, 0, 6))
            .unwrap();
        assert_eq!(out.as_str(), "version: 9.9.9\nappVersion: 0.3.0+6\n");
    }

    #[test]
    fn test_custom_key_is_escaped() {
        let format = ManifestFormat::new("app.version").unwrap();
        let doc = ManifestDocument::new("appXversion: 1.0.0\n");
        assert!(matches!(
            format.read_version(&doc),
            Err(CommitBumpError::ManifestParse { .. })
        ));
    }

    #[test]
    fn test_invalid_key() {
        assert!(ManifestFormat::new("").is_err());
        assert!(ManifestFormat::new("my version").is_err());
        assert!(ManifestFormat::new("version:").is_err());
    }
}

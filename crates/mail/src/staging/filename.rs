//! Filename sanitizing for staged attachments

/// Used when nothing usable is left of a filename
const FALLBACK_NAME: &str = "attachment";

/// Make an attachment filename safe to join onto the staging directory
///
/// Directory components are dropped and only the final path component is
/// kept. Reserved characters and control characters become `_`. A name with
/// no stem (`.pdf`) gets [`FALLBACK_NAME`] in front of it, and names that
/// collapse to `.`/`..`/empty are replaced by it, keeping the original
/// extension when there was one. A name ending in `.<ext>` always yields a
/// name that still ends in `.<ext>` and has a non-empty stem.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_end_matches('.');

    if cleaned.is_empty() {
        return match name.rsplit_once('.') {
            Some((_, ext)) if is_plain_extension(ext) => format!("{}.{}", FALLBACK_NAME, ext),
            _ => FALLBACK_NAME.to_string(),
        };
    }

    if cleaned.starts_with('.') {
        return format!("{}{}", FALLBACK_NAME, cleaned);
    }

    cleaned.to_string()
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::ExtensionFilter;

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(sanitize_filename("BE_1234567.pdf"), "BE_1234567.pdf");
        assert_eq!(sanitize_filename("Final Copy (2).pdf"), "Final Copy (2).pdf");
    }

    #[test]
    fn test_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\x\\a.pdf"), "a.pdf");
    }

    #[test]
    fn test_replaces_reserved_characters() {
        assert_eq!(sanitize_filename("a:b*c?.pdf"), "a_b_c_.pdf");
        assert_eq!(sanitize_filename("tab\there.pdf"), "tab_here.pdf");
    }

    #[test]
    fn test_degenerate_names() {
        assert_eq!(sanitize_filename(""), "attachment");
        assert_eq!(sanitize_filename(".."), "attachment");
        assert_eq!(sanitize_filename("dir/"), "attachment");
        assert_eq!(sanitize_filename("dir/.."), "attachment");
    }

    #[test]
    fn test_stemless_names_get_fallback_stem() {
        assert_eq!(sanitize_filename(".pdf"), "attachment.pdf");
        assert_eq!(sanitize_filename("scans/.pdf"), "attachment.pdf");
        assert_eq!(sanitize_filename(" .PDF"), "attachment.PDF");
        assert_eq!(sanitize_filename("a\\.pdf"), "attachment.pdf");
        assert_eq!(sanitize_filename("..pdf"), "attachment..pdf");
    }

    #[test]
    fn test_output_keeps_matching_extension() {
        let filter = ExtensionFilter::pdf();
        for name in [
            "BE.pdf",
            ".pdf",
            "scans/.pdf",
            " .pdf",
            "...pdf",
            "x/y\\z .PDF",
            "../../.pdf",
            "a?*.pdf",
        ] {
            assert!(filter.matches(name), "{name}");
            let sanitized = sanitize_filename(name);
            assert!(filter.matches(&sanitized), "{name} -> {sanitized}");
            assert!(!sanitized.starts_with('.'), "{name} -> {sanitized}");
        }
    }
}

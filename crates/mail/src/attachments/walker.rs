//! Depth-first walk over a MIME part tree

use std::slice;

use super::ExtensionFilter;
use crate::models::{AttachmentDescriptor, ContentRef, MessageId, MimePart};

/// A matching leaf, borrowed from the tree it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentRef<'a> {
    pub filename: &'a str,
    pub mime_type: Option<&'a str>,
    pub content: &'a ContentRef,
}

impl AttachmentRef<'_> {
    /// Owned descriptor for fetching this attachment from `message_id`
    pub fn to_descriptor(&self, message_id: &MessageId) -> AttachmentDescriptor {
        AttachmentDescriptor {
            message_id: message_id.clone(),
            content: self.content.clone(),
            filename: self.filename.to_string(),
        }
    }
}

/// Lazy pre-order traversal yielding matching leaves
///
/// Uses an explicit stack of sibling iterators, so nesting depth is bounded
/// only by memory.
pub struct Walk<'a> {
    stack: Vec<slice::Iter<'a, MimePart>>,
    filter: ExtensionFilter,
}

impl<'a> Iterator for Walk<'a> {
    type Item = AttachmentRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            let Some(part) = siblings.next() else {
                self.stack.pop();
                continue;
            };

            match part {
                MimePart::Container { children } => self.stack.push(children.iter()),
                MimePart::Leaf {
                    filename: Some(filename),
                    mime_type,
                    content: Some(content),
                } if self.filter.matches(filename) => {
                    return Some(AttachmentRef {
                        filename,
                        mime_type: mime_type.as_deref(),
                        content,
                    });
                }
                MimePart::Leaf { .. } => {}
            }
        }
        None
    }
}

/// Walk `parts` for PDF attachments
pub fn walk_parts(parts: &[MimePart]) -> Walk<'_> {
    walk_parts_with(parts, ExtensionFilter::pdf())
}

/// Walk `parts` for attachments matching `filter`
pub fn walk_parts_with(parts: &[MimePart], filter: ExtensionFilter) -> Walk<'_> {
    Walk {
        stack: vec![parts.iter()],
        filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parts: &[MimePart]) -> Vec<&str> {
        walk_parts(parts).map(|a| a.filename).collect()
    }

    fn nest(depth: usize, leaf: MimePart) -> MimePart {
        (0..depth).fold(leaf, |inner, _| MimePart::container(vec![inner]))
    }

    #[test]
    fn test_flat_parts() {
        let parts = vec![
            MimePart::body("text/plain"),
            MimePart::attachment("a.pdf", "1"),
            MimePart::attachment("b.xlsx", "2"),
        ];
        assert_eq!(names(&parts), vec!["a.pdf"]);
    }

    #[test]
    fn test_finds_deeply_nested_attachments() {
        let parts = vec![
            nest(3, MimePart::attachment("deep3.pdf", "1")),
            MimePart::container(vec![
                MimePart::body("text/html"),
                nest(5, MimePart::attachment("deep6.PDF", "2")),
            ]),
            MimePart::attachment("top.pdf", "3"),
        ];
        assert_eq!(names(&parts), vec!["deep3.pdf", "deep6.PDF", "top.pdf"]);
    }

    #[test]
    fn test_pre_order() {
        let parts = vec![MimePart::container(vec![
            MimePart::attachment("1.pdf", "a"),
            MimePart::container(vec![MimePart::attachment("2.pdf", "b")]),
            MimePart::attachment("3.pdf", "c"),
        ])];
        assert_eq!(names(&parts), vec!["1.pdf", "2.pdf", "3.pdf"]);
    }

    #[test]
    fn test_skips_leaves_without_filename_or_content() {
        let parts = vec![
            MimePart::Leaf {
                filename: None,
                mime_type: Some("application/pdf".to_string()),
                content: Some(ContentRef::Remote {
                    attachment_id: "1".to_string(),
                }),
            },
            MimePart::Leaf {
                filename: Some("no-body.pdf".to_string()),
                mime_type: None,
                content: None,
            },
            MimePart::Leaf {
                filename: Some(String::new()),
                mime_type: None,
                content: Some(ContentRef::Remote {
                    attachment_id: "2".to_string(),
                }),
            },
        ];
        assert!(names(&parts).is_empty());
    }

    #[test]
    fn test_inline_content_is_discovered() {
        let parts = vec![MimePart::Leaf {
            filename: Some("small.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            content: Some(ContentRef::Inline {
                data: "JVBERi0".to_string(),
            }),
        }];
        let found: Vec<_> = walk_parts(&parts).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].mime_type, Some("application/pdf"));
    }

    #[test]
    fn test_walk_is_repeatable() {
        let parts = vec![nest(4, MimePart::attachment("x.pdf", "1"))];
        assert_eq!(walk_parts(&parts).count(), 1);
        assert_eq!(walk_parts(&parts).count(), 1);
    }

    #[test]
    fn test_custom_filter() {
        let parts = vec![
            MimePart::attachment("a.pdf", "1"),
            MimePart::attachment("b.xml", "2"),
        ];
        let found: Vec<_> = walk_parts_with(&parts, ExtensionFilter::new("xml"))
            .map(|a| a.filename)
            .collect();
        assert_eq!(found, vec!["b.xml"]);
    }

    #[test]
    fn test_to_descriptor() {
        let parts = vec![MimePart::attachment("a.pdf", "att-7")];
        let found = walk_parts(&parts).next().unwrap();
        let descriptor = found.to_descriptor(&MessageId::new("m1"));
        assert_eq!(descriptor.message_id.as_str(), "m1");
        assert_eq!(descriptor.filename, "a.pdf");
        assert_eq!(
            descriptor.content,
            ContentRef::Remote {
                attachment_id: "att-7".to_string()
            }
        );
    }
}

use crate::error::{DagError, Result};
use tracing::debug;

/// One `NAME: PARENT, PARENT` line after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub parents: Vec<String>,
    /// 1-based position in the input, kept for error reporting
    pub line: usize,
}

/// Parse a single declaration.
///
/// Whitespace around the name and every parent is ignored. A parent segment
/// that is empty or all whitespace declares a root node.
pub fn parse_declaration(line: usize, text: &str) -> Result<Declaration> {
    let (name_part, parent_part) = text
        .split_once(':')
        .ok_or_else(|| DagError::malformed(line, format!("missing ':' in {:?}", text)))?;

    if parent_part.contains(':') {
        return Err(DagError::malformed(
            line,
            format!("more than one ':' in {:?}", text),
        ));
    }

    let name = name_part.trim();
    if name.is_empty() {
        return Err(DagError::malformed(line, "empty node name"));
    }

    let parents = if parent_part.trim().is_empty() {
        Vec::new()
    } else {
        parent_part
            .split(',')
            .map(str::trim)
            .map(|parent| {
                if parent.is_empty() {
                    Err(DagError::malformed(
                        line,
                        format!("empty parent name in declaration of {}", name),
                    ))
                } else {
                    Ok(parent.to_string())
                }
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Declaration {
        name: name.to_string(),
        parents,
        line,
    })
}

/// Line-oriented reader for whole documents of declarations
#[derive(Debug, Clone)]
pub struct DeclarationParser {
    comment_prefix: Option<String>,
    skip_blank_lines: bool,
}

impl DeclarationParser {
    pub fn new(comment_prefix: Option<String>, skip_blank_lines: bool) -> Self {
        Self {
            comment_prefix: comment_prefix.filter(|prefix| !prefix.is_empty()),
            skip_blank_lines,
        }
    }

    /// Split a document into declarations, dropping comments and blank lines
    /// as configured. Line numbers refer to the original document.
    pub fn parse_document(&self, content: &str) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();

            if self.skip_blank_lines && trimmed.is_empty() {
                continue;
            }
            if let Some(prefix) = &self.comment_prefix {
                if trimmed.starts_with(prefix.as_str()) {
                    continue;
                }
            }

            declarations.push(parse_declaration(index + 1, raw)?);
        }

        debug!("Parsed {} declarations", declarations.len());
        Ok(declarations)
    }
}

impl Default for DeclarationParser {
    fn default() -> Self {
        Self::new(Some("#".to_string()), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_declaration() {
        let decl = parse_declaration(1, "A:").unwrap();

        assert_eq!(decl.name, "A");
        assert!(decl.parents.is_empty());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let decl = parse_declaration(4, "  D :  B ,C  ").unwrap();

        assert_eq!(decl.name, "D");
        assert_eq!(decl.parents, vec!["B".to_string(), "C".to_string()]);
        assert_eq!(decl.line, 4);
    }

    #[test]
    fn test_whitespace_only_parent_segment_is_root() {
        let decl = parse_declaration(1, "A:    ").unwrap();
        assert!(decl.parents.is_empty());
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        let err = parse_declaration(3, "A").unwrap_err();
        assert!(matches!(err, DagError::MalformedDeclaration { line: 3, .. }));
    }

    #[test]
    fn test_extra_colon_is_malformed() {
        assert!(parse_declaration(1, "A: B: C").is_err());
    }

    #[test]
    fn test_empty_name_is_malformed() {
        assert!(parse_declaration(1, "  : A").is_err());
    }

    #[test]
    fn test_empty_parent_entry_is_malformed() {
        assert!(parse_declaration(1, "A: B, , C").is_err());
        assert!(parse_declaration(1, "A: B,").is_err());
    }

    #[test]
    fn test_document_skips_comments_and_blank_lines() {
        let parser = DeclarationParser::default();
        let content = "# roots\nA:\n\nB: A\n   # indented comment\nC: B\n";

        let declarations = parser.parse_document(content).unwrap();

        let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(declarations[2].line, 6);
    }

    #[test]
    fn test_document_without_skipping_rejects_blank_line() {
        let parser = DeclarationParser::new(None, false);
        let err = parser.parse_document("A:\n\nB: A").unwrap_err();

        assert!(matches!(err, DagError::MalformedDeclaration { line: 2, .. }));
    }
}

//! Document-level checks: the root element and the instruction elements
//! beneath it.

use crate::error::LoadError;
use roxmltree::{Document, Node};

/// Required root element name.
pub const ROOT_ELEMENT: &str = "program";

/// Required value of the root's `language` attribute.
pub const LANGUAGE: &str = "IPPcode18";

/// Name of every child element of the root.
pub const INSTRUCTION_ELEMENT: &str = "instruction";

/// Validate the root element and return it.
pub(crate) fn check_root<'a, 'input>(
    doc: &'a Document<'input>,
) -> Result<Node<'a, 'input>, LoadError> {
    let root = doc.root_element();
    let tag = root.tag_name().name();

    if tag != ROOT_ELEMENT {
        return Err(LoadError::InvalidRoot(tag.to_string()));
    }

    match root.attribute("language") {
        None => Err(LoadError::MissingLanguage),
        Some(LANGUAGE) => Ok(root),
        Some(other) => Err(LoadError::UnknownLanguage(other.to_string())),
    }
}

/// Element children of the root, each checked to be an `instruction`.
///
/// Text, comments and processing instructions between elements are skipped.
pub(crate) fn instruction_elements<'a, 'input>(
    root: Node<'a, 'input>,
) -> impl Iterator<Item = Result<Node<'a, 'input>, LoadError>> {
    root.children()
        .filter(Node::is_element)
        .enumerate()
        .map(|(idx, node)| {
            let tag = node.tag_name().name();
            if tag == INSTRUCTION_ELEMENT {
                Ok(node)
            } else {
                Err(LoadError::UnexpectedElement {
                    position: idx + 1,
                    tag: tag.to_string(),
                })
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_result(xml: &str) -> Result<(), LoadError> {
        let doc = Document::parse(xml).unwrap();
        check_root(&doc).map(|_| ())
    }

    #[test]
    fn accepts_program_root() {
        assert_eq!(root_result(r#"<program language="IPPcode18"/>"#), Ok(()));
    }

    #[test]
    fn ignores_extra_root_attributes() {
        assert_eq!(
            root_result(r#"<program language="IPPcode18" name="demo" description="x"/>"#),
            Ok(())
        );
    }

    #[test]
    fn rejects_wrong_root() {
        assert_eq!(
            root_result(r#"<prog language="IPPcode18"/>"#),
            Err(LoadError::InvalidRoot("prog".to_string()))
        );
    }

    #[test]
    fn rejects_missing_language() {
        assert_eq!(root_result("<program/>"), Err(LoadError::MissingLanguage));
    }

    #[test]
    fn rejects_wrong_language() {
        assert_eq!(
            root_result(r#"<program language="ippcode18"/>"#),
            Err(LoadError::UnknownLanguage("ippcode18".to_string()))
        );
    }

    #[test]
    fn instruction_elements_skip_text_and_comments() {
        let doc = Document::parse(
            r#"<program language="IPPcode18">
                <!-- comment -->
                <instruction order="1" opcode="BREAK"/>
                <instruction order="2" opcode="BREAK"/>
            </program>"#,
        )
        .unwrap();
        let root = check_root(&doc).unwrap();
        let nodes: Vec<_> = instruction_elements(root).collect();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(Result::is_ok));
    }

    #[test]
    fn instruction_elements_flag_foreign_elements() {
        let doc = Document::parse(
            r#"<program language="IPPcode18">
                <instruction order="1" opcode="BREAK"/>
                <instr order="2" opcode="BREAK"/>
            </program>"#,
        )
        .unwrap();
        let root = check_root(&doc).unwrap();
        let results: Vec<_> = instruction_elements(root).collect();
        assert_eq!(
            results[1].as_ref().err(),
            Some(&LoadError::UnexpectedElement {
                position: 2,
                tag: "instr".to_string()
            })
        );
    }
}

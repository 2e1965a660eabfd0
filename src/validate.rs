//! Opt-in cross-reference check for sequence elements.
//!
//! The builders accept any tag; the sequencer is the authority on whether a
//! jump target exists. Callers who want an early answer can run
//! [`check_references`]: a tag resolves when an earlier `Event` or `Repeat`
//! carries it as its name.

use crate::element::SequenceElement;
use crate::error::{AppResult, ReferenceIssue, SequenceError};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Collect every `Repeat`/`Goto` whose tag does not name an earlier element.
pub fn unresolved_references(elements: &[SequenceElement]) -> Vec<ReferenceIssue> {
    let mut labels: HashSet<&str> = HashSet::new();
    let mut issues = Vec::new();

    for (position, element) in elements.iter().enumerate() {
        if let Some(tag) = element.reference_tag() {
            if labels.contains(tag) {
                trace!(position, tag, "reference resolved");
            } else {
                issues.push(ReferenceIssue {
                    position,
                    tag: tag.to_string(),
                });
            }
        }

        if !matches!(element, SequenceElement::Goto { .. }) {
            labels.insert(element.name());
        }
    }

    issues
}

/// Fail with every unresolved reference at once.
pub fn check_references(elements: &[SequenceElement]) -> AppResult<()> {
    let issues = unresolved_references(elements);
    if issues.is_empty() {
        Ok(())
    } else {
        debug!(count = issues.len(), "unresolved reference tags");
        Err(SequenceError::UnresolvedReferences(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceSequence;

    fn event(name: &str) -> SequenceElement {
        SequenceElement::event(name, Vec::<DeviceSequence>::new())
    }

    #[test]
    fn test_backward_references_resolve() {
        let elements = vec![
            event("Start"),
            SequenceElement::repeat("Loop", "Start", 3),
            SequenceElement::goto("Loop"),
        ];
        assert!(check_references(&elements).is_ok());
    }

    #[test]
    fn test_forward_reference_reported() {
        let elements = vec![
            SequenceElement::goto("Later"),
            event("Later"),
        ];
        assert_eq!(
            unresolved_references(&elements),
            vec![ReferenceIssue {
                position: 0,
                tag: "Later".into()
            }]
        );
    }

    #[test]
    fn test_self_reference_is_unresolved() {
        let elements = vec![SequenceElement::repeat("Loop", "Loop", 2)];
        assert_eq!(unresolved_references(&elements).len(), 1);
    }

    #[test]
    fn test_goto_does_not_define_label() {
        let elements = vec![
            event("A"),
            SequenceElement::goto("A"),
            SequenceElement::goto("Name Tag"),
        ];
        let issues = unresolved_references(&elements);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].position, 2);
    }

    #[test]
    fn test_all_issues_collected() {
        let elements = vec![
            SequenceElement::goto("x"),
            SequenceElement::repeat("r", "y", 1),
        ];
        match check_references(&elements) {
            Err(SequenceError::UnresolvedReferences(issues)) => assert_eq!(issues.len(), 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

//! The metadata stream's XML document: identification, the default
//! (blank) template, and the dotted-path set/clear/show editor.
//!
//! Tag names use dot syntax (`subject.age`) and resolve to element
//! paths under the document's `<desc>` node, so all custom fields live
//! at `desc/subject/age` and friends.

use thiserror::Error;
use uuid::Uuid;
use xmltree::{Element, EmitterConfig, XMLNode};

/// Stream name that marks the metadata stream.
pub const METADATA_NAME: &str = "Metadata";
/// Stream type that marks the metadata stream.
pub const METADATA_TYPE: &str = "Metadata";

#[derive(Error, Debug)]
pub enum TagError {
    #[error("malformed metadata document: {0}")]
    Parse(#[from] xmltree::ParseError),
    #[error("unable to serialize metadata document: {0}")]
    Emit(#[from] xmltree::Error),
    #[error("--set expects NAME=VALUE, got: {0}")]
    BadAssignment(String),
}

/// Blank metadata document used when a file has no metadata stream yet.
/// Each call embeds a freshly generated uid.
pub fn default_document() -> String {
    format!(
        r#"<?xml version="1.0"?>
<info>
    <name>{METADATA_NAME}</name>
    <type>{METADATA_TYPE}</type>
    <channel_count>0</channel_count>
    <nominal_srate>0</nominal_srate>
    <channel_format>string</channel_format>
    <source_id></source_id>
    <version>1.1000000000000001</version>
    <created_at>0</created_at>
    <uid>{uid}</uid>
    <session_id>default</session_id>
    <hostname>undefined</hostname>
    <desc></desc>
</info>"#,
        uid = Uuid::new_v4(),
    )
}

/// Whether a stream header document declares the metadata name and
/// type. Content that does not parse as XML is simply some other
/// stream's header.
pub fn is_metadata_stream(content: &str) -> bool {
    let root = match Element::parse(content.as_bytes()) {
        Ok(root) => root,
        Err(_) => return false,
    };
    if root.name != "info" {
        return false;
    }
    child_text(&root, "name").as_deref() == Some(METADATA_NAME)
        && child_text(&root, "type").as_deref() == Some(METADATA_TYPE)
}

fn child_text(el: &Element, name: &str) -> Option<String> {
    el.get_child(name)
        .and_then(|child| child.get_text())
        .map(|text| text.into_owned())
}

/// Apply show/clear/set directives to a metadata document and return
/// the content to splice back. With no set or clear directives the
/// input string is returned untouched, so a show-only run stays on the
/// byte-exact no-op path.
pub fn apply_directives(
    content: &str,
    to_set: &[String],
    to_clear: &[String],
    to_show: &[String],
) -> Result<String, TagError> {
    let mut root = Element::parse(content.as_bytes())?;

    for name in to_show {
        let parts: Vec<&str> = name.split('.').collect();
        if let Some(desc) = root.get_child("desc") {
            for node in find_all(desc, &parts) {
                println!("{}: {}", name, node.get_text().unwrap_or_default());
            }
        }
    }

    for name in to_clear {
        let parts: Vec<&str> = name.split('.').collect();
        if let Some(desc) = root.get_mut_child("desc") {
            clear_path(desc, &parts);
        }
    }

    for assignment in to_set {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| TagError::BadAssignment(assignment.clone()))?;
        let parts: Vec<&str> = name.split('.').collect();
        let desc = ensure_child_mut(&mut root, "desc");
        set_path(desc, &parts, value);
    }

    if to_set.is_empty() && to_clear.is_empty() {
        return Ok(content.to_string());
    }

    let mut out = Vec::new();
    root.write_with_config(
        &mut out,
        EmitterConfig::new().write_document_declaration(false),
    )?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// All descendants of `el` reached by following `path` name for name.
fn find_all<'a>(el: &'a Element, path: &[&str]) -> Vec<&'a Element> {
    match path.split_first() {
        None => vec![el],
        Some((head, rest)) => el
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .filter(|child| child.name == *head)
            .flat_map(|child| find_all(child, rest))
            .collect(),
    }
}

/// Remove every element matched by `path` from its parent.
fn clear_path(el: &mut Element, path: &[&str]) {
    match path {
        [] => (),
        [leaf] => {
            el.children
                .retain(|node| node.as_element().map_or(true, |child| child.name != *leaf));
        }
        [head, rest @ ..] => {
            for node in &mut el.children {
                if let Some(child) = node.as_mut_element() {
                    if child.name == *head {
                        clear_path(child, rest);
                    }
                }
            }
        }
    }
}

/// Set the text of the first element matched by `path`, creating any
/// missing path segments along the way.
fn set_path(el: &mut Element, path: &[&str], value: &str) {
    match path.split_first() {
        None => {
            el.children.retain(|node| !matches!(node, XMLNode::Text(_)));
            el.children.push(XMLNode::Text(value.to_string()));
        }
        Some((head, rest)) => set_path(ensure_child_mut(el, head), rest, value),
    }
}

fn ensure_child_mut<'a>(el: &'a mut Element, name: &str) -> &'a mut Element {
    if el.get_child(name).is_none() {
        el.children.push(XMLNode::Element(Element::new(name)));
    }
    el.get_mut_child(name).expect("child was just inserted")
}


#[cfg(test)]
mod test_directives {
    use super::*;

    fn field(content: &str, path: &[&str]) -> Option<String> {
        let root = Element::parse(content.as_bytes()).unwrap();
        let desc = root.get_child("desc")?;
        find_all(desc, path)
            .first()
            .and_then(|el| el.get_text())
            .map(|text| text.into_owned())
    }

    #[test]
    fn set_creates_nested_path() {
        let result = apply_directives(
            &default_document(),
            &["subject.age=29".to_string()],
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(field(&result, &["subject", "age"]), Some("29".to_string()));
    }

    #[test]
    fn set_overrides_existing_value() {
        let first = apply_directives(
            &default_document(),
            &["subject.id=subj001".to_string()],
            &[],
            &[],
        )
        .unwrap();
        let second =
            apply_directives(&first, &["subject.id=subj002".to_string()], &[], &[]).unwrap();

        assert_eq!(
            field(&second, &["subject", "id"]),
            Some("subj002".to_string())
        );
        // Still a single node, not a second sibling.
        let root = Element::parse(second.as_bytes()).unwrap();
        let desc = root.get_child("desc").unwrap();
        assert_eq!(find_all(desc, &["subject", "id"]).len(), 1);
    }

    #[test]
    fn set_creates_desc_when_missing() {
        let bare = "<info><name>Metadata</name><type>Metadata</type></info>";
        let result =
            apply_directives(bare, &["subject.name=Alice".to_string()], &[], &[]).unwrap();

        assert_eq!(
            field(&result, &["subject", "name"]),
            Some("Alice".to_string())
        );
    }

    #[test]
    fn clear_removes_all_matches() {
        let doc = "<info><desc>\
                   <subject><age>29</age></subject>\
                   <subject><age>31</age></subject>\
                   </desc></info>";
        let result =
            apply_directives(doc, &[], &["subject.age".to_string()], &[]).unwrap();

        assert_eq!(field(&result, &["subject", "age"]), None);
        // The parents survive, only the leaves go.
        let root = Element::parse(result.as_bytes()).unwrap();
        let desc = root.get_child("desc").unwrap();
        assert_eq!(find_all(desc, &["subject"]).len(), 2);
    }

    #[test]
    fn clear_of_absent_field_is_a_noop_edit() {
        let before = apply_directives(
            &default_document(),
            &["subject.age=29".to_string()],
            &[],
            &[],
        )
        .unwrap();
        let after =
            apply_directives(&before, &[], &["subject.handedness".to_string()], &[]).unwrap();

        assert_eq!(field(&after, &["subject", "age"]), Some("29".to_string()));
    }

    #[test]
    fn show_only_returns_content_untouched() {
        let content = default_document();
        let result =
            apply_directives(&content, &[], &[], &["subject.age".to_string()]).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        assert!(matches!(
            apply_directives(&default_document(), &["subject.age".to_string()], &[], &[]),
            Err(TagError::BadAssignment(_))
        ));
    }

    #[test]
    fn unparseable_document_is_an_error() {
        assert!(matches!(
            apply_directives("not xml", &["a=b".to_string()], &[], &[]),
            Err(TagError::Parse(_))
        ));
    }
}

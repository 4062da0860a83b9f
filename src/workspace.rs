use crate::blocks::Block;
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;
use xmltree::{Element, XMLNode};

/// Reads a workspace file and returns its top-level blocks in document order.
pub fn load_workspace(path: &Path) -> Result<Vec<Block>> {
    let data = fs::read(path).with_context(|| format!("Failed to read '{}'.", path.display()))?;
    parse_workspace(&data).with_context(|| format!("Invalid workspace '{}'.", path.display()))
}

pub fn parse_workspace(data: &[u8]) -> Result<Vec<Block>> {
    let root = Element::parse(Cursor::new(data)).map_err(|e| anyhow!("Malformed XML: {}.", e))?;
    if root.name != "xml" {
        bail!("Expected an <xml> root element, found <{}>.", root.name);
    }
    let blocks = child_elements(&root)
        .filter(|e| e.name == "block")
        .map(parse_block)
        .collect::<Result<Vec<_>>>()?;
    debug!(top_blocks = blocks.len(), "parsed workspace");
    Ok(blocks)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

fn parse_block(element: &Element) -> Result<Block> {
    let kind = element
        .attributes
        .get("type")
        .ok_or_else(|| anyhow!("<{}> is missing its 'type' attribute.", element.name))?;
    let mut block = Block::new(kind.as_str());
    for child in child_elements(element) {
        match child.name.as_str() {
            "title" => {
                block.titles.insert(slot_of(child, kind)?, text_of(child));
            }
            "label" => {
                block.labels.insert(slot_of(child, kind)?, text_of(child));
            }
            "variable" => {
                block.variables.insert(slot_of(child, kind)?, text_of(child));
            }
            "value" => {
                if let Some(inner) = inner_block(child) {
                    block.values.insert(slot_of(child, kind)?, parse_block(inner)?);
                }
            }
            "statement" => {
                if let Some(inner) = inner_block(child) {
                    block
                        .statements
                        .insert(slot_of(child, kind)?, parse_block(inner)?);
                }
            }
            "mutation" => {
                block.mutation.items = count_of(child, "items", kind)?;
                block.mutation.elseif = count_of(child, "elseif", kind)?;
                block.mutation.else_ = count_of(child, "else", kind)?;
            }
            "next" => {
                if let Some(inner) = inner_block(child) {
                    block.next = Some(Box::new(parse_block(inner)?));
                }
            }
            other => debug!(kind = %kind, element = other, "ignoring unknown element"),
        }
    }
    Ok(block)
}

/// The `<block>` inside a value, statement or next element; a `<shadow>` stands in when no block is plugged.
fn inner_block(element: &Element) -> Option<&Element> {
    child_elements(element)
        .find(|e| e.name == "block")
        .or_else(|| child_elements(element).find(|e| e.name == "shadow"))
}

fn text_of(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.into_owned())
        .unwrap_or_default()
}

fn slot_of(element: &Element, kind: &str) -> Result<usize> {
    match element.attributes.get("slot") {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            anyhow!(
                "Invalid slot '{}' on <{}> of block '{}'.",
                raw,
                element.name,
                kind
            )
        }),
    }
}

fn count_of(element: &Element, attribute: &str, kind: &str) -> Result<usize> {
    match element.attributes.get(attribute) {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            anyhow!(
                "Invalid {} count '{}' on block '{}'.",
                attribute,
                raw,
                kind
            )
        }),
    }
}

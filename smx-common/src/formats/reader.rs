//! Structural reader for SMX documents
//!
//! Re-parses emitted text and checks that each block's declared `count`
//! matches the number of child elements it actually contains. This is the
//! invariant any SMX consumer relies on.

use xmltree::{Element, XMLNode};

use super::SMX_FORMAT_VERSION;

/// Structural validation error
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Text is not well-formed XML
    #[error("malformed SMX document: {0}")]
    Malformed(#[from] xmltree::ParseError),

    /// Root element is not `<model>`
    #[error("expected <model> root element, found <{0}>")]
    UnexpectedRoot(String),

    /// `version` attribute missing or unsupported
    #[error("unsupported model version {0:?} (expected {expected})", expected = SMX_FORMAT_VERSION)]
    UnsupportedVersion(Option<String>),

    /// Block has no parseable `count` attribute
    #[error("<{block}> has a missing or invalid count attribute")]
    InvalidCount { block: String },

    /// Declared count differs from the number of child elements
    #[error("<{block}> declares count=\"{declared}\" but contains {actual} elements")]
    CountMismatch {
        block: String,
        declared: usize,
        actual: usize,
    },

    /// Mandatory block is absent
    #[error("missing <{0}> block")]
    MissingBlock(&'static str),
}

/// Verified element counts of a document's blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockCounts {
    pub vertices: usize,
    /// `None` when the document has no normal block
    pub normals: Option<usize>,
    /// Zero when the document has no texture block
    pub textures: usize,
    pub primitives: usize,
}

/// Parse an SMX document and verify every block's declared count.
pub fn read_block_counts(text: &str) -> Result<BlockCounts, FormatError> {
    let root = Element::parse(text.as_bytes())?;
    if root.name != "model" {
        return Err(FormatError::UnexpectedRoot(root.name));
    }

    let version = root.attributes.get("version");
    if version.and_then(|v| v.parse::<u32>().ok()) != Some(SMX_FORMAT_VERSION) {
        return Err(FormatError::UnsupportedVersion(version.cloned()));
    }

    let mut counts = BlockCounts::default();
    let mut saw_vertices = false;
    let mut saw_primitives = false;

    for block in child_elements(&root) {
        let verified = verified_count(block)?;
        match block.name.as_str() {
            "vertices" => {
                counts.vertices = verified;
                saw_vertices = true;
            }
            "normals" => counts.normals = Some(verified),
            "textures" => counts.textures = verified,
            "primitives" => {
                counts.primitives = verified;
                saw_primitives = true;
            }
            _ => {}
        }
    }

    if !saw_vertices {
        return Err(FormatError::MissingBlock("vertices"));
    }
    if !saw_primitives {
        return Err(FormatError::MissingBlock("primitives"));
    }

    Ok(counts)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

fn verified_count(block: &Element) -> Result<usize, FormatError> {
    let declared = block
        .attributes
        .get("count")
        .and_then(|c| c.parse::<usize>().ok())
        .ok_or_else(|| FormatError::InvalidCount {
            block: block.name.clone(),
        })?;
    let actual = child_elements(block).count();
    if declared != actual {
        return Err(FormatError::CountMismatch {
            block: block.name.clone(),
            declared,
            actual,
        });
    }
    Ok(declared)
}

//! Materials, shader graphs and the texture table
//!
//! The encoder never looks at shader nodes itself. It asks a
//! [`TextureLookup`] for a material's texture and indexes the answer in a
//! [`TextureTable`] built once per export.

use hashbrown::HashMap;
use std::borrow::Cow;
use std::path::Path;

/// Reference to an image resource, identified by its name or path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    name: String,
}

impl TextureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base file name without directory or extension (`file` attribute)
    pub fn stem(&self) -> Cow<'_, str> {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or(Cow::Borrowed(self.name.as_str()))
    }
}

/// Node of a material's shader graph
///
/// Inputs link to other nodes by index into [`ShaderGraph::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderNode {
    Diffuse { color: Option<usize> },
    Emission { color: Option<usize> },
    /// Two-input color mix (e.g. texture multiplied by vertex color)
    MixRgb {
        color1: Option<usize>,
        color2: Option<usize>,
    },
    ImageTexture { image: TextureRef },
    VertexColor,
}

/// Shader node graph of one material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderGraph {
    pub nodes: Vec<ShaderNode>,
}

impl ShaderGraph {
    /// Add a node and return its index for linking
    pub fn add(&mut self, node: ShaderNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn node(&self, link: Option<usize>) -> Option<&ShaderNode> {
        link.and_then(|i| self.nodes.get(i))
    }

    /// Diffuse shader fed directly by an image
    pub fn diffuse_texture(image: TextureRef) -> Self {
        let mut graph = Self::default();
        let tex = graph.add(ShaderNode::ImageTexture { image });
        graph.add(ShaderNode::Diffuse { color: Some(tex) });
        graph
    }

    /// Diffuse shader fed by an image mixed with vertex color
    pub fn diffuse_texture_vertex_color(image: TextureRef) -> Self {
        let mut graph = Self::default();
        let col = graph.add(ShaderNode::VertexColor);
        let tex = graph.add(ShaderNode::ImageTexture { image });
        let mix = graph.add(ShaderNode::MixRgb {
            color1: Some(col),
            color2: Some(tex),
        });
        graph.add(ShaderNode::Diffuse { color: Some(mix) });
        graph
    }

    /// Emission shader fed directly by an image
    pub fn emission_texture(image: TextureRef) -> Self {
        let mut graph = Self::default();
        let tex = graph.add(ShaderNode::ImageTexture { image });
        graph.add(ShaderNode::Emission { color: Some(tex) });
        graph
    }
}

/// A material slot's contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// `None` for materials without a node graph
    pub graph: Option<ShaderGraph>,
}

impl Material {
    pub fn new(name: impl Into<String>, graph: Option<ShaderGraph>) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }
}

/// Resolves the single texture a material draws with, if any
pub trait TextureLookup {
    fn texture_of(&self, material: &Material) -> Option<TextureRef>;
}

/// [`TextureLookup`] over [`ShaderGraph`]s
///
/// Takes the first diffuse or emission node and follows its color input.
/// A mix node is looked through once, picking the first input that is an
/// image. Any other shape means the material is untextured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderGraphLookup;

impl TextureLookup for ShaderGraphLookup {
    fn texture_of(&self, material: &Material) -> Option<TextureRef> {
        let texture = material.graph.as_ref().and_then(graph_texture);
        if texture.is_none() {
            tracing::debug!("Material '{}' has no readable texture input", material.name);
        }
        texture
    }
}

fn graph_texture(graph: &ShaderGraph) -> Option<TextureRef> {
    let color = graph.nodes.iter().find_map(|node| match node {
        ShaderNode::Diffuse { color } | ShaderNode::Emission { color } => Some(*color),
        _ => None,
    })?;

    match graph.node(color)? {
        ShaderNode::ImageTexture { image } => Some(image.clone()),
        ShaderNode::MixRgb { color1, color2 } => [*color1, *color2]
            .into_iter()
            .find_map(|input| match graph.node(input) {
                Some(ShaderNode::ImageTexture { image }) => Some(image.clone()),
                _ => None,
            }),
        _ => None,
    }
}

/// Deduplicated, first-seen-ordered texture table of one export
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    entries: Vec<TextureRef>,
    index: HashMap<TextureRef, usize>,
}

impl TextureTable {
    /// Build the table from the mesh's material slots, in slot order.
    pub fn resolve(materials: &[Option<Material>], lookup: &dyn TextureLookup) -> Self {
        let mut table = Self::default();
        for material in materials.iter().flatten() {
            if let Some(texture) = lookup.texture_of(material) {
                table.insert(texture);
            }
        }
        table
    }

    /// Insert a texture, returning its (possibly existing) index
    pub fn insert(&mut self, texture: TextureRef) -> usize {
        if let Some(&i) = self.index.get(&texture) {
            return i;
        }
        let i = self.entries.len();
        self.index.insert(texture.clone(), i);
        self.entries.push(texture);
        i
    }

    pub fn index_of(&self, texture: &TextureRef) -> Option<usize> {
        self.index.get(texture).copied()
    }

    /// Texture index for a material.
    ///
    /// `Ok(None)` for untextured or missing materials; `Err` carries a
    /// texture the lookup resolved that this table never saw.
    pub fn texture_index_of(
        &self,
        lookup: &dyn TextureLookup,
        material: Option<&Material>,
    ) -> Result<Option<usize>, TextureRef> {
        match material.and_then(|m| lookup.texture_of(m)) {
            None => Ok(None),
            Some(texture) => self.index_of(&texture).map(Some).ok_or(texture),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureRef> {
        self.entries.iter()
    }

    /// File stems in index order
    pub fn stems(&self) -> Vec<String> {
        self.iter().map(|t| t.stem().into_owned()).collect()
    }
}

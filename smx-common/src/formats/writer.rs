//! Text serializer for SMX documents
//!
//! Layout is tab-indented, one element per line. Attribute order inside
//! `<poly>` is fixed: vertices, normals, shading, colors, texture, UVs, type.

use std::fmt::{self, Display, Formatter, Write};

use super::document::SmxDocument;
use super::primitive::PrimitiveRecord;
use super::SMX_FORMAT_VERSION;

impl Display for SmxDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            writeln!(f, "<!-- {} -->", comment_text(line))?;
        }
        writeln!(f, "<model version=\"{}\">", SMX_FORMAT_VERSION)?;

        writeln!(f, "\t<vertices count=\"{}\">", self.vertices.len())?;
        for v in &self.vertices {
            write_vector(f, v)?;
        }
        writeln!(f, "\t</vertices>")?;

        if let Some(normals) = &self.normals {
            writeln!(f, "\t<normals count=\"{}\">", normals.len())?;
            writeln!(f, "\t\t<!-- Smooth normals begin here -->")?;
            for n in &normals.smooth {
                write_vector(f, n)?;
            }
            if normals.has_flats() {
                writeln!(f, "\t\t<!-- Flat normals begin here -->")?;
                for n in &normals.flat {
                    write_vector(f, n)?;
                }
            }
            writeln!(f, "\t</normals>")?;
        }

        if !self.textures.is_empty() {
            writeln!(f, "\t<textures count=\"{}\">", self.textures.len())?;
            for stem in &self.textures {
                writeln!(f, "\t\t<texture file=\"{}\"/>", Escaped(stem))?;
            }
            writeln!(f, "\t</textures>")?;
        }

        writeln!(f, "\t<primitives count=\"{}\">", self.primitives.len())?;
        for poly in &self.primitives {
            writeln!(f, "\t\t{}", poly)?;
        }
        writeln!(f, "\t</primitives>")?;

        writeln!(f, "</model>")
    }
}

impl Display for PrimitiveRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("<poly")?;
        for (i, v) in self.vertices.iter().enumerate() {
            write!(f, " v{i}=\"{v}\"")?;
        }
        for (i, n) in self.normals.iter().enumerate() {
            write!(f, " n{i}=\"{n}\"")?;
        }
        write!(f, " shading=\"{}\"", self.shading.code())?;
        for (i, [r, g, b]) in self.colors.iter().enumerate() {
            write!(f, " r{i}=\"{r}\" g{i}=\"{g}\" b{i}=\"{b}\"")?;
        }
        if let Some(texture) = &self.texture {
            write!(f, " texture=\"{}\"", texture.index)?;
            for (i, [u, v]) in texture.uvs.iter().enumerate() {
                write!(f, " tu{i}=\"{}\" tv{i}=\"{}\"", Float(*u), Float(*v))?;
            }
        }
        write!(f, " type=\"{}\"/>", self.type_tag())
    }
}

fn write_vector(f: &mut Formatter<'_>, v: &[f32; 3]) -> fmt::Result {
    writeln!(
        f,
        "\t\t<v x=\"{}\" y=\"{}\" z=\"{}\"/>",
        Float(v[0]),
        Float(v[1]),
        Float(v[2])
    )
}

/// Fixed six-decimal float; negative zero prints as zero.
struct Float(f32);

impl Display for Float {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0 + 0.0)
    }
}

/// XML attribute escaping
struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// XML comments may not contain `--`
fn comment_text(line: &str) -> String {
    let mut out = line.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}

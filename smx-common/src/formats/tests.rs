//! Tests for the SMX serializer and reader

use super::*;

fn gray_triangle() -> PrimitiveRecord {
    PrimitiveRecord {
        vertices: vec![0, 2, 1],
        normals: vec![0, 2, 1],
        shading: ShadingMode::Smooth,
        color_mode: ColorMode::Flat,
        colors: vec![[128, 128, 128]; 3],
        texture: None,
    }
}

fn textured_quad() -> PrimitiveRecord {
    PrimitiveRecord {
        vertices: vec![3, 2, 0, 1],
        normals: vec![8],
        shading: ShadingMode::Flat,
        color_mode: ColorMode::Gouraud,
        colors: vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        texture: Some(TextureBinding {
            index: 1,
            uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
        }),
    }
}

// ========================================================================
// Type Tag Tests
// ========================================================================

#[test]
fn test_type_tag_letter_order() {
    let tag = TypeTag {
        color: ColorMode::Flat,
        textured: true,
        arity: 3,
    };
    assert_eq!(tag.to_string(), "FT3");

    let tag = TypeTag {
        color: ColorMode::Gouraud,
        textured: false,
        arity: 4,
    };
    assert_eq!(tag.to_string(), "G4");
}

#[test]
fn test_type_tag_derived_from_record() {
    assert_eq!(gray_triangle().type_tag().to_string(), "F3");
    assert_eq!(textured_quad().type_tag().to_string(), "GT4");
}

#[test]
fn test_color_mode_classify() {
    assert_eq!(ColorMode::classify(&[[10, 10, 10]; 3]), ColorMode::Flat);
    assert_eq!(
        ColorMode::classify(&[[1, 1, 1], [2, 2, 2], [3, 3, 3]]),
        ColorMode::Gouraud
    );
    assert_eq!(ColorMode::classify(&[]), ColorMode::Flat);
}

// ========================================================================
// Writer Tests
// ========================================================================

#[test]
fn test_poly_attribute_order_untextured() {
    assert_eq!(
        gray_triangle().to_string(),
        "<poly v0=\"0\" v1=\"2\" v2=\"1\" n0=\"0\" n1=\"2\" n2=\"1\" shading=\"S\" \
         r0=\"128\" g0=\"128\" b0=\"128\" r1=\"128\" g1=\"128\" b1=\"128\" \
         r2=\"128\" g2=\"128\" b2=\"128\" type=\"F3\"/>"
    );
}

#[test]
fn test_poly_attribute_order_textured() {
    let line = textured_quad().to_string();
    let order = ["v3=", "n0=", "shading=\"F\"", "b3=", "texture=\"1\"", "tu0=", "tv3=", "type=\"GT4\""];
    let positions: Vec<usize> = order
        .iter()
        .map(|needle| line.find(needle).unwrap_or_else(|| panic!("missing {needle} in {line}")))
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "attributes out of order: {line}"
    );
    assert!(line.contains("tu1=\"1.000000\" tv1=\"1.000000\""));
    assert!(!line.contains("n1="), "flat primitive has a single normal");
}

#[test]
fn test_document_layout() {
    let doc = SmxDocument {
        header: vec!["made by a test".to_string()],
        vertices: vec![[1.0, -0.0, 2.5]],
        normals: Some(NormalBlock {
            smooth: vec![[0.0, -1.0, 0.0]],
            flat: vec![],
        }),
        textures: vec![],
        primitives: vec![],
    };

    let expected = "<!-- made by a test -->\n\
        <model version=\"1\">\n\
        \t<vertices count=\"1\">\n\
        \t\t<v x=\"1.000000\" y=\"0.000000\" z=\"2.500000\"/>\n\
        \t</vertices>\n\
        \t<normals count=\"1\">\n\
        \t\t<!-- Smooth normals begin here -->\n\
        \t\t<v x=\"0.000000\" y=\"-1.000000\" z=\"0.000000\"/>\n\
        \t</normals>\n\
        \t<primitives count=\"0\">\n\
        \t</primitives>\n\
        </model>\n";
    assert_eq!(doc.render(), expected);
}

#[test]
fn test_texture_block_only_when_present() {
    let mut doc = SmxDocument {
        primitives: vec![gray_triangle()],
        vertices: vec![[0.0; 3]; 3],
        ..Default::default()
    };
    assert!(!doc.render().contains("<textures"));

    doc.textures = vec!["crate & barrel".to_string()];
    let text = doc.render();
    assert!(text.contains("<textures count=\"1\">"));
    assert!(text.contains("<texture file=\"crate &amp; barrel\"/>"));
}

#[test]
fn test_flat_normals_follow_smooth() {
    let normals = NormalBlock {
        smooth: vec![[0.0, 0.0, 1.0]; 4],
        flat: vec![[0.0, 1.0, 0.0]; 2],
    };
    assert!(normals.has_flats());
    assert_eq!(normals.len(), 6);
    assert_eq!(normals.flat_base(), 4);

    let doc = SmxDocument {
        normals: Some(normals),
        ..Default::default()
    };
    let text = doc.render();
    let smooth_at = text.find("Smooth normals begin here").unwrap();
    let flat_at = text.find("Flat normals begin here").unwrap();
    assert!(smooth_at < flat_at);
}

#[test]
fn test_header_comment_is_sanitized() {
    let doc = SmxDocument {
        header: vec!["run smxopt --strip ---".to_string()],
        ..Default::default()
    };
    let text = doc.render();
    let first = text.lines().next().unwrap();
    let body = &first[4..first.len() - 3];
    assert!(!body.contains("--"), "comment body still has '--': {first}");
}

// ========================================================================
// Reader Tests
// ========================================================================

#[test]
fn test_reader_counts_match_writer() {
    let doc = SmxDocument {
        header: vec!["header".to_string()],
        vertices: vec![[0.0; 3]; 5],
        normals: Some(NormalBlock {
            smooth: vec![[0.0; 3]; 5],
            flat: vec![[0.0; 3]; 2],
        }),
        textures: vec!["brick".to_string()],
        primitives: vec![gray_triangle(), textured_quad()],
    };

    let counts = read_block_counts(&doc.render()).expect("document should verify");
    assert_eq!(
        counts,
        BlockCounts {
            vertices: 5,
            normals: Some(7),
            textures: 1,
            primitives: 2,
        }
    );
}

#[test]
fn test_reader_without_optional_blocks() {
    let doc = SmxDocument {
        vertices: vec![[0.0; 3]; 3],
        primitives: vec![gray_triangle()],
        ..Default::default()
    };
    let counts = read_block_counts(&doc.render()).unwrap();
    assert_eq!(counts.normals, None);
    assert_eq!(counts.textures, 0);
}

#[test]
fn test_reader_detects_count_mismatch() {
    let text = "<model version=\"1\">\n\
        \t<vertices count=\"2\">\n\
        \t\t<v x=\"0\" y=\"0\" z=\"0\"/>\n\
        \t</vertices>\n\
        \t<primitives count=\"0\"></primitives>\n\
        </model>\n";
    match read_block_counts(text) {
        Err(FormatError::CountMismatch {
            block,
            declared,
            actual,
        }) => {
            assert_eq!(block, "vertices");
            assert_eq!(declared, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected count mismatch, got {other:?}"),
    }
}

#[test]
fn test_reader_rejects_bad_documents() {
    assert!(matches!(
        read_block_counts("<scene version=\"1\"/>"),
        Err(FormatError::UnexpectedRoot(_))
    ));
    assert!(matches!(
        read_block_counts("<model version=\"2\"><vertices count=\"0\"/><primitives count=\"0\"/></model>"),
        Err(FormatError::UnsupportedVersion(_))
    ));
    assert!(matches!(
        read_block_counts("<model version=\"1\"><vertices count=\"x\"/></model>"),
        Err(FormatError::InvalidCount { .. })
    ));
    assert!(matches!(
        read_block_counts("<model version=\"1\"><vertices count=\"0\"/></model>"),
        Err(FormatError::MissingBlock("primitives"))
    ));
    assert!(matches!(
        read_block_counts("<model version=\"1\">"),
        Err(FormatError::Malformed(_))
    ));
}

#[test]
fn test_reader_error_messages() {
    let err = read_block_counts("<model version=\"2\"><vertices count=\"0\"/><primitives count=\"0\"/></model>")
        .unwrap_err();
    assert_eq!(err.to_string(), "unsupported model version Some(\"2\") (expected 1)");

    let err = read_block_counts("<model><vertices count=\"0\"/><primitives count=\"0\"/></model>").unwrap_err();
    assert_eq!(err.to_string(), "unsupported model version None (expected 1)");

    let err = read_block_counts("<model version=\"1\"><vertices count=\"2\"><v/></vertices></model>").unwrap_err();
    assert_eq!(err.to_string(), "<vertices> declares count=\"2\" but contains 1 elements");
}

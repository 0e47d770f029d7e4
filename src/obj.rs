use std::io::Read;
use std::path::Path;

use glam::{Vec2, Vec3};
use nom::branch::alt;
use nom::bytes::complete::take_till1;
use nom::character::complete::{char, digit1, one_of, space1};
use nom::combinator::{all_consuming, eof, map, opt, peek, recognize};
use nom::multi::separated_list1;
use nom::number::complete::float;
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

use crate::dedup::{AttributePools, FaceVertexKey, MeshBuilder};
use crate::error::{ImportError, ImportResult};
use crate::model::Model;
use crate::options::ImportOptions;

/*
    Records
*/

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(record, _)| record)
}

/// Non-empty, comment-free records with their 1-based line numbers.
fn records(data: &str) -> impl Iterator<Item = (usize, &str)> {
    data.lines().enumerate().filter_map(|(i, line)| {
        let record = strip_comment(line).trim();
        (!record.is_empty()).then_some((i + 1, record))
    })
}

/*
    Basic Parsers
*/

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn field_end(input: &str) -> IResult<&str, &str> {
    peek(alt((space1, eof)))(input)
}

fn coordinate(input: &str) -> IResult<&str, f32> {
    preceded(space1, terminated(float, field_end))(input)
}

/*
    Vertices and Vertex Normals
*/

fn vector3(input: &str) -> IResult<&str, Vec3> {
    let (input, (x, y, z)) = tuple((coordinate, coordinate, coordinate))(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

/*
    Texture Coordinates
*/

fn texture_coordinates(input: &str) -> IResult<&str, Vec2> {
    let (input, (u, v)) = tuple((coordinate, coordinate))(input)?;
    Ok((input, Vec2::new(u, v)))
}

/*
    Face
*/

/// A signed index. Values beyond `i32` saturate, so they never resolve to a
/// pool entry.
fn integer(input: &str) -> IResult<&str, i32> {
    map(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i32>()
            .unwrap_or(if s.starts_with('-') { i32::MIN } else { i32::MAX })
    })(input)
}

fn face_index(input: &str) -> IResult<&str, FaceVertexKey> {
    let (input, position) = integer(input)?;
    let (input, rest) = opt(tuple((
        preceded(char('/'), opt(integer)),
        opt(preceded(char('/'), opt(integer))),
    )))(input)?;

    let (tex_coord, normal) = match rest {
        Some((tex_coord, normal)) => (tex_coord, normal.flatten()),
        None => (None, None),
    };

    Ok((input, FaceVertexKey::from_obj(position, tex_coord, normal)))
}

fn face(input: &str) -> IResult<&str, Vec<FaceVertexKey>> {
    all_consuming(preceded(
        space1,
        separated_list1(space1, terminated(face_index, field_end)),
    ))(input)
}

/*
    Import
*/

fn interpret(
    line: usize,
    record: &str,
    pools: &mut AttributePools,
    builder: &mut MeshBuilder<'_>,
) -> ImportResult<()> {
    let (body, kind) =
        keyword(record).map_err(|_| ImportError::malformed(line, record, "missing keyword"))?;

    match kind {
        "v" => {
            let (_, p) = vector3(body)
                .map_err(|_| ImportError::malformed(line, record, "invalid vertex"))?;
            pools.positions.push(p);
        }
        "vn" => {
            let (_, n) = vector3(body)
                .map_err(|_| ImportError::malformed(line, record, "invalid vertex normal"))?;
            pools.normals.push(n);
        }
        "vt" => {
            let (_, uv) = texture_coordinates(body)
                .map_err(|_| ImportError::malformed(line, record, "invalid texture coordinates"))?;
            pools.tex_coords.push(uv);
        }
        "f" => {
            let (_, corners) =
                face(body).map_err(|_| ImportError::malformed(line, record, "invalid face"))?;
            let corners: [FaceVertexKey; 3] = corners
                .try_into()
                .map_err(|_| ImportError::malformed(line, record, "face is not a triangle"))?;
            builder.push_face(pools, corners, line)?;
        }
        other => tracing::trace!(line, keyword = other, "ignoring unsupported record"),
    }

    Ok(())
}

/// Import OBJ text into deduplicated vertex and index buffers.
///
/// The first malformed `v`, `vn`, `vt` or `f` record aborts the import.
/// Faces that reference an undeclared position are dropped and counted in
/// [`Model::dropped_faces`].
pub fn parse_obj_file(data: &str, options: &ImportOptions) -> ImportResult<Model> {
    let mut pools = AttributePools::default();
    let mut builder = MeshBuilder::new(options);

    for (line, record) in records(data) {
        interpret(line, record, &mut pools, &mut builder)?;
    }

    tracing::debug!(
        positions = pools.positions.len(),
        normals = pools.normals.len(),
        tex_coords = pools.tex_coords.len(),
        "parsed OBJ attributes"
    );

    builder.finish()
}

/// Read all of `reader` as UTF-8 text, then import it.
pub fn read_obj<R: Read>(mut reader: R, options: &ImportOptions) -> ImportResult<Model> {
    let mut data = String::new();
    reader
        .read_to_string(&mut data)
        .map_err(|e| ImportError::unavailable(None, e))?;
    parse_obj_file(&data, options)
}

pub fn load_obj_file<P: AsRef<Path>>(path: P, options: &ImportOptions) -> ImportResult<Model> {
    let path = path.as_ref();
    let data =
        std::fs::read_to_string(path).map_err(|e| ImportError::unavailable(Some(path), e))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "read OBJ file");
    parse_obj_file(&data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSENT: i32 = FaceVertexKey::ABSENT;

    fn key(position: i32, tex_coord: i32, normal: i32) -> FaceVertexKey {
        FaceVertexKey { position, tex_coord, normal }
    }

    #[test]
    fn test_records_skip_blank_and_comment_lines() {
        let input = "# header\n\n   v 1 2 3\n\t# indented comment\nvn 0 1 0 # trailing\r\n  \nf 1 1 1";
        let found: Vec<_> = records(input).collect();
        assert_eq!(found, vec![(3, "v 1 2 3"), (5, "vn 0 1 0"), (7, "f 1 1 1")]);
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!(keyword("vn 0 1 0"), Ok((" 0 1 0", "vn")));
        assert_eq!(keyword("usemtl Material"), Ok((" Material", "usemtl")));
    }

    #[test]
    fn test_parse_vertex() {
        let input = " 1.000000 1.000000 -1.000000";
        assert_eq!(vector3(input), Ok(("", Vec3::new(1.0, 1.0, -1.0))));
    }

    #[test]
    fn test_parse_vertex_with_w_component() {
        let input = " 1.0 2.0 3.0 1.0";
        assert_eq!(vector3(input), Ok((" 1.0", Vec3::new(1.0, 2.0, 3.0))));
    }

    #[test]
    fn test_parse_vertex_with_tabs() {
        assert_eq!(vector3("\t0.5\t-2\t1e2"), Ok(("", Vec3::new(0.5, -2.0, 100.0))));
    }

    #[test]
    fn test_parse_vertex_missing_component() {
        assert!(vector3(" 1.0 2.0").is_err());
    }

    #[test]
    fn test_parse_vertex_non_numeric() {
        assert!(vector3(" 1.0 abc 3.0").is_err());
        assert!(vector3(" 1.0 2.0x 3.0").is_err());
    }

    #[test]
    fn test_parse_texture_coordinates() {
        let input = " 0.333134 0.000200";
        assert_eq!(texture_coordinates(input), Ok(("", Vec2::new(0.333134, 0.000200))));
    }

    #[test]
    fn test_parse_texture_coordinates_ignores_w() {
        let (_, uv) = texture_coordinates(" 0.25 0.75 0.0").unwrap();
        assert_eq!(uv, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_parse_face_index() {
        let input = "1/16/10005 ";
        let expected_remainder = " ";

        assert_eq!(face_index(input), Ok((expected_remainder, key(0, 15, 10004))));
    }

    #[test]
    fn test_parse_face_index_forms() {
        assert_eq!(face_index("7"), Ok(("", key(6, ABSENT, ABSENT))));
        assert_eq!(face_index("7/2"), Ok(("", key(6, 1, ABSENT))));
        assert_eq!(face_index("7//3"), Ok(("", key(6, ABSENT, 2))));
        assert_eq!(face_index("7/2/"), Ok(("", key(6, 1, ABSENT))));
    }

    #[test]
    fn test_parse_face() {
        let input = " 5/1/1 3/2/1 1/3/1";

        assert_eq!(
            face(input),
            Ok(("", vec![key(4, 0, 0), key(2, 1, 0), key(0, 2, 0)]))
        );
    }

    #[test]
    fn test_parse_face_missing_texture_coordinates() {
        let input = " 5//1 3//1 1//1";

        assert_eq!(
            face(input),
            Ok(("", vec![key(4, ABSENT, 0), key(2, ABSENT, 0), key(0, ABSENT, 0)]))
        );
    }

    #[test]
    fn test_parse_face_non_numeric_segment() {
        assert!(face(" 1/x/1 2/1/1 3/1/1").is_err());
        assert!(face(" 1 2 3a").is_err());
        assert!(face(" 1/1/n 2 3").is_err());
    }

    #[test]
    fn test_parse_face_index_saturates_huge_values() {
        assert_eq!(integer("99999999999"), Ok(("", i32::MAX)));
        assert_eq!(integer("-99999999999"), Ok(("", i32::MIN)));
        assert_eq!(integer("+12 "), Ok((" ", 12)));
        assert!(integer("+").is_err());
        assert_eq!(
            face_index("1//99999999999"),
            Ok(("", key(0, ABSENT, i32::MAX - 1)))
        );
    }

    #[test]
    fn test_face_index_texture_one_is_not_absent() {
        let (_, with_tex) = face_index("1/1/1").unwrap();
        let (_, without_tex) = face_index("1//1").unwrap();
        assert_eq!(with_tex.tex_coord, 0);
        assert_eq!(without_tex.tex_coord, ABSENT);
        assert_ne!(with_tex, without_tex);
    }

    #[test]
    fn test_interpret_quad_is_rejected() {
        let options = ImportOptions::default();
        let mut pools = AttributePools::default();
        let mut builder = MeshBuilder::new(&options);

        let err = interpret(4, "f 1 2 3 4", &mut pools, &mut builder).unwrap_err();
        match err {
            ImportError::MalformedRecord { line, record, .. } => {
                assert_eq!(line, 4);
                assert_eq!(record, "f 1 2 3 4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interpret_ignores_unknown_keywords() {
        let options = ImportOptions::default();
        let mut pools = AttributePools::default();
        let mut builder = MeshBuilder::new(&options);

        for record in ["o Cube", "mtllib cube_uv.mtl", "usemtl Material", "s off", "g group"] {
            interpret(1, record, &mut pools, &mut builder).unwrap();
        }
        assert!(pools.positions.is_empty());
    }

    #[test]
    fn test_parse_obj_file() {
        let s = include_str!("../assets/cube_uv.obj");

        let model = parse_obj_file(s, &ImportOptions::default()).unwrap();

        assert_eq!(model.vertex_count(), 24);
        assert_eq!(model.triangle_count(), 12);
        assert_eq!(model.dropped_faces, 0);
        assert!(model.tex_coords.is_none());

        let first = model.vertex(0).unwrap();
        assert_eq!(first.p, Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(first.normal, Some(Vec3::Y));

        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.center(), Vec3::ZERO);
        assert!((bounds.radius() - 3f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_parse_obj_file_with_tex_coords() {
        let s = include_str!("../assets/cube_uv.obj");
        let options = ImportOptions::positions_only().with_tex_coords(true);

        let model = parse_obj_file(s, &options).unwrap();

        assert!(model.normals.is_none());
        let uvs = model.tex_coords.as_ref().unwrap();
        assert_eq!(uvs.len(), model.positions.len());
        assert_eq!(&uvs[..4], &[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
    }

    #[test]
    fn test_malformed_vertex_aborts_import() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 one 0\nf 1 2 3\n";

        match parse_obj_file(input, &ImportOptions::default()) {
            Err(ImportError::MalformedRecord { line, record, reason }) => {
                assert_eq!(line, 3);
                assert_eq!(record, "v 0 one 0");
                assert_eq!(reason, "invalid vertex");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_read_obj() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let model = read_obj(input.as_bytes(), &ImportOptions::default()).unwrap();
        assert_eq!(model.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_read_obj_invalid_utf8() {
        let input: &[u8] = &[b'v', b' ', 0xff, 0xfe];
        let err = read_obj(input, &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::SourceUnavailable { path: None, .. }));
    }
}

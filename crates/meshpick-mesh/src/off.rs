//! OFF / COFF reader.
//!
//! ```text
//! OFF            (or COFF: four 0..255 color components follow each vertex)
//! nV nF nE
//! x y z [r g b a]      nV times
//! 3 i0 i1 i2           nF times
//! ```
//!
//! Tokens are whitespace separated and line breaks carry no meaning, so a
//! file may put several records on one line. `#` starts a comment.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use meshpick_math::{Point3, Vec4};

use crate::error::{MeshError, Result};
use crate::store::{GeometryStore, Vertex};

/// Upper bound on the up-front reservation taken from header counts.
const MAX_RESERVE: usize = 1 << 20;

/// Read an OFF or COFF file from a path.
pub fn read_off(path: impl AsRef<Path>) -> Result<GeometryStore> {
    let file = File::open(path)?;
    read_off_from_reader(BufReader::new(file))
}

/// Read OFF or COFF data from a buffered reader.
///
/// Faces are validated and vertex normals are computed before returning.
pub fn read_off_from_reader<R: BufRead>(reader: R) -> Result<GeometryStore> {
    let mut tokens = Tokens::new(reader);

    let (line, header) = tokens.next_token("header")?;
    let has_color = match header.as_str() {
        "OFF" => false,
        "COFF" => true,
        other => return Err(MeshError::format(line, format!("wrong header '{other}'"))),
    };

    let num_vertices: usize = tokens.parse("vertex count")?;
    let num_faces: usize = tokens.parse("face count")?;
    let _num_edges: usize = tokens.parse("edge count")?;

    // Header counts are untrusted; the arrays still grow past this as records arrive.
    let mut store =
        GeometryStore::with_capacity(num_vertices.min(MAX_RESERVE), num_faces.min(MAX_RESERVE));

    for _ in 0..num_vertices {
        let x = tokens.parse("vertex x")?;
        let y = tokens.parse("vertex y")?;
        let z = tokens.parse("vertex z")?;
        let mut vertex = Vertex::new(Point3::new(x, y, z));

        if has_color {
            let mut c = [0.0; 4];
            for component in &mut c {
                *component = tokens.parse::<f64>("vertex color")?;
            }
            vertex = vertex.with_color(Vec4::from(c) / 255.0);
        }

        store.add_vertex(vertex);
    }

    for face in 0..num_faces {
        let arity: usize = tokens.parse("face arity")?;
        if arity != 3 {
            return Err(MeshError::NonTriangularFace { face, arity });
        }
        let i0 = tokens.parse("face index")?;
        let i1 = tokens.parse("face index")?;
        let i2 = tokens.parse("face index")?;
        store.add_face(i0, i1, i2);
    }

    store.validate()?;
    store.compute_normals();

    Ok(store)
}

/// Whitespace tokenizer that remembers the line of each token.
struct Tokens<R> {
    reader: R,
    line: usize,
    pending: std::vec::IntoIter<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: Vec::new().into_iter(),
        }
    }

    fn next_token(&mut self, what: &str) -> Result<(usize, String)> {
        loop {
            if let Some(token) = self.pending.next() {
                return Ok((self.line, token));
            }

            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(MeshError::format(
                    self.line,
                    format!("unexpected end of file, expected {what}"),
                ));
            }
            self.line += 1;

            let content = buf.split('#').next().unwrap_or_default();
            self.pending = content
                .split_whitespace()
                .map(str::to_owned)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let (line, token) = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| MeshError::format(line, format!("invalid {what} '{token}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshpick_math::Vec3;

    const TETRAHEDRON: &str = "OFF
# a tetrahedron
4 4 6
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
";

    #[test]
    fn test_read_tetrahedron() {
        let store = read_off_from_reader(TETRAHEDRON.as_bytes()).unwrap();
        assert_eq!(store.num_vertices(), 4);
        assert_eq!(store.num_faces(), 4);
        assert_eq!(store.faces()[3], [1, 2, 3]);
        for v in store.vertices() {
            assert_relative_eq!(v.normal.norm(), 1.0, epsilon = 1e-12);
            assert_eq!(v.color, Vertex::default_color());
        }
        // Vertex 0 sits at the corner: its normal points away from the solid.
        let n0 = store.vertices()[0].normal;
        assert!(n0.dot(&Vec3::new(-1.0, -1.0, -1.0)) > 0.0);
    }

    #[test]
    fn test_read_coff_colors() {
        let data = "COFF\n3 1 0\n0 0 0 255 0 0 255\n1 0 0 0 255 0 255\n0 1 0 0 0 255 51\n3 0 1 2\n";
        let store = read_off_from_reader(data.as_bytes()).unwrap();
        assert_relative_eq!(store.vertices()[0].color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(store.vertices()[2].color, Vec4::new(0.0, 0.0, 1.0, 0.2));
    }

    #[test]
    fn test_records_may_share_lines() {
        let data = "OFF 3 1 0 0 0 0 1 0 0 0 1 0 3 0 1 2";
        let store = read_off_from_reader(data.as_bytes()).unwrap();
        assert_eq!(store.num_faces(), 1);
    }

    #[test]
    fn test_wrong_header() {
        let err = read_off_from_reader("PLY\n3 1 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 1, .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_header() {
        let err = read_off_from_reader("OFF\n3 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 2, .. }));
    }

    #[test]
    fn test_huge_counts_rejected() {
        let err = read_off_from_reader("OFF\n100000000000000000 1 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 2, .. }));

        let err = read_off_from_reader("OFF\n0 18446744073709551615 0\n".as_bytes()).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_vertices() {
        let err = read_off_from_reader("OFF\n3 1 0\n0 0 0\n1 0\n".as_bytes()).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_bad_number() {
        let err = read_off_from_reader("OFF\n1 0 0\n0 zero 0\n".as_bytes()).unwrap_err();
        match err {
            MeshError::Format { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("zero"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_quad_is_rejected() {
        let data = "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";
        let err = read_off_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::NonTriangularFace { face: 0, arity: 4 }));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let data = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 3\n";
        let err = read_off_from_reader(data.as_bytes()).unwrap_err();
        assert!(err.is_geometry_error());
    }
}

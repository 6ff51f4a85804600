use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{ debug, warn };

use crate::error::{ Error, Result };
use crate::shape::{ Shape, ShapeArena, ShapeId };
use crate::tuple::Tuple4D;

/// One corner of a face: a vertex index and an optional normal index, both
/// one-based as written in the file.
type FaceVertex = (usize, Option<usize>);

/// A parser for OBJ files.
///
/// A sample OBJ file may look like the following:
///
/// ```obj
/// v -1 1 0
/// v -1 0 0
/// v 1 0 0
/// v 1 1 0
///
/// g FirstGroup
/// f 1 2 3
/// g SecondGroup
/// f 1 3 4
/// ```
///
/// The first word of each line names a statement, and the words after it are
/// its arguments. `v` specifies a vertex as a point, `vn` a vertex normal, and
/// `f` a face composed of vertices (optionally with normals, as `v//vn` or
/// `v/vt/vn`).
///
/// `g` specifies a named group, which collects the faces that follow it.
/// Groups do not nest; in the above example, `SecondGroup` is separate from
/// `FirstGroup`. Faces before any `g` land in the default group, named `""`.
///
/// Other statements are skipped and counted in `ignored_lines`.
#[derive(Clone, Debug, Default)]
pub struct ObjParser {
    pub ignored_lines: usize,

    pub vertices: Vec<Tuple4D>,
    pub normals: Vec<Tuple4D>,

    groups: BTreeMap<String, ShapeId>,
    current_group: String,
}

impl ObjParser {
    pub fn new() -> ObjParser {
        Default::default()
    }

    /// The group created for `name`, if any face or `g` statement used it.
    pub fn group(&self, name: &str) -> Option<ShapeId> {
        self.groups.get(name).copied()
    }

    /// Parses OBJ source text, adding triangles to `shapes`.
    pub fn parse(&mut self, shapes: &mut ShapeArena, source: &str) -> Result<()> {
        for (i, line) in source.lines().enumerate() {
            let line = line.trim();

            // Ignore empty lines.
            if line.is_empty() {
                continue;
            }

            self.handle_command(shapes, i + 1, line)?;
        }

        debug!("parsed OBJ: {} vertices, {} normals, {} groups, {} lines ignored",
            self.vertices.len(), self.normals.len(), self.groups.len(), self.ignored_lines);
        Ok(())
    }

    /// Collects every group of the file under one new group.
    pub fn into_group(self, shapes: &mut ShapeArena) -> ShapeId {
        let root = shapes.add(Shape::group());

        for (_, g) in self.groups {
            shapes.add_child(root, g);
        }

        root
    }

    fn handle_command(&mut self, shapes: &mut ShapeArena, n: usize,
        line: &str) -> Result<()> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let params: Vec<&str> = words.collect();

        match command {
            "v" => {
                let [x, y, z] = parse_xyz(n, &params)?;
                self.vertices.push(Tuple4D::point(x, y, z));
            },
            "vn" => {
                let [x, y, z] = parse_xyz(n, &params)?;
                self.normals.push(Tuple4D::vector(x, y, z));
            },
            "f" => {
                let face = params.iter()
                    .map(|p| self.parse_face_vertex(n, p))
                    .collect::<Result<Vec<_>>>()?;

                if face.len() < 3 {
                    return Err(obj_error(n, "a face needs at least three vertices"));
                }

                let group = self.current_group_id(shapes);
                for triangle in self.fan_triangulation(&face) {
                    let t = shapes.add(triangle);
                    shapes.add_child(group, t);
                }
            },
            "g" => match params.first() {
                Some(name) => {
                    self.current_group = name.to_string();
                    self.current_group_id(shapes);
                },
                None => {
                    warn!("OBJ line {}: group statement without a name", n);
                    self.ignored_lines += 1;
                },
            },
            _ => {
                self.ignored_lines += 1;
            },
        }

        Ok(())
    }

    /// The group faces are currently added to, created on first use.
    fn current_group_id(&mut self, shapes: &mut ShapeArena) -> ShapeId {
        *self.groups.entry(self.current_group.clone())
            .or_insert_with(|| shapes.add(Shape::group()))
    }

    fn parse_face_vertex(&self, n: usize, word: &str) -> Result<FaceVertex> {
        let attributes: Vec<&str> = word.split('/').collect();
        if attributes.len() > 3 {
            return Err(obj_error(n, format!("malformed face vertex `{}`", word)));
        }

        let v = parse_index(n, attributes[0], self.vertices.len(), "vertex")?;
        let vn = match attributes.get(2) {
            Some(s) if !s.is_empty() =>
                Some(parse_index(n, s, self.normals.len(), "normal")?),
            _ => None,
        };

        Ok((v, vn))
    }

    /// Partitions a polygon into triangles.
    ///
    /// In an OBJ file, faces can be specified like so:
    ///
    /// ```obj
    /// f 1 2 3 4 5
    /// ```
    ///
    /// Since the only polygon primitives are triangles, the polygon is cut
    /// into a "fan" around its first vertex:
    ///
    /// ```text
    ///         B *
    ///          / \
    ///         /   \
    ///        /     \
    ///     A *       * C
    ///       |       |
    ///       |       |
    ///     E * ----- * D
    /// ```
    ///
    /// Starting at `A`, the triangles are `A-B-C`, `A-C-D` and `A-D-E`. The
    /// polygon is assumed to be convex.
    ///
    /// If every vertex of the face has a normal, smooth triangles are produced.
    fn fan_triangulation(&self, face: &[FaceVertex]) -> Vec<Shape> {
        let vertex = |fv: &FaceVertex| self.vertices[fv.0 - 1];
        let smooth = face.iter().all(|fv| fv.1.is_some());

        (1..face.len() - 1).map(|i| {
            let (a, b, c) = (&face[0], &face[i], &face[i + 1]);

            match (smooth, a.1, b.1, c.1) {
                (true, Some(n1), Some(n2), Some(n3)) => Shape::smooth_triangle(
                    vertex(a), vertex(b), vertex(c),
                    self.normals[n1 - 1], self.normals[n2 - 1], self.normals[n3 - 1],
                ),
                _ => Shape::triangle(vertex(a), vertex(b), vertex(c)),
            }
        }).collect()
    }
}

/// Reads and parses an OBJ file, returning a group holding all of its groups.
pub fn load_obj(shapes: &mut ShapeArena, path: &Path) -> Result<ShapeId> {
    let source = fs::read_to_string(path)?;
    let mut parser = ObjParser::new();
    parser.parse(shapes, &source)?;

    if parser.ignored_lines > 0 {
        warn!("{}: ignored {} unsupported lines", path.display(), parser.ignored_lines);
    }

    Ok(parser.into_group(shapes))
}

fn obj_error(line: usize, message: impl Into<String>) -> Error {
    Error::Obj { line, message: message.into() }
}

fn parse_xyz(n: usize, params: &[&str]) -> Result<[f64; 3]> {
    if params.len() < 3 {
        return Err(obj_error(n, "expected three coordinates"));
    }

    let mut xyz = [0.0; 3];
    for (slot, word) in xyz.iter_mut().zip(params) {
        *slot = word.parse()
            .map_err(|_| obj_error(n, format!("invalid number `{}`", word)))?;
    }

    Ok(xyz)
}

/// Parses a one-based index, checking it against the number of records seen
/// so far.
fn parse_index(n: usize, word: &str, count: usize, what: &str) -> Result<usize> {
    let index: usize = word.parse()
        .map_err(|_| obj_error(n, format!("invalid {} index `{}`", what, word)))?;

    if index == 0 || index > count {
        return Err(obj_error(n, format!("{} index {} out of range", what, index)));
    }

    Ok(index)
}

#[cfg(test)]
use crate::shape::ShapeKind;

#[cfg(test)]
fn parse_source(source: &str) -> (ObjParser, ShapeArena) {
    let mut shapes = ShapeArena::new();
    let mut parser = ObjParser::new();
    parser.parse(&mut shapes, source).unwrap();
    (parser, shapes)
}

#[cfg(test)]
fn triangle_points(shapes: &ShapeArena, id: ShapeId) -> (Tuple4D, Tuple4D, Tuple4D) {
    match shapes[id].kind {
        ShapeKind::Triangle(ref ti) => (ti.p1, ti.p2, ti.p3),
        ShapeKind::SmoothTriangle(ref sti) => (sti.triangle.p1, sti.triangle.p2, sti.triangle.p3),
        _ => panic!("expected a triangle"),
    }
}

#[test]
fn ignoring_unrecognized_lines() {
    let gibberish = "There was a young lady named Bright\n\
                     who traveled much faster than light.\n\
                     She set out one day\n\
                     in a relative way,\n\
                     and came back the previous night.\n";
    let (parser, _) = parse_source(gibberish);

    assert_eq!(parser.ignored_lines, 5);
}

#[test]
fn vertex_records() {
    let (parser, _) = parse_source("v -1 1 0\nv -1.0000 0.5000 0.0000\nv 1 0 0\nv 1 1 0\n");

    assert_eq!(parser.vertices[0], Tuple4D::point(-1.0, 1.0, 0.0));
    assert_eq!(parser.vertices[1], Tuple4D::point(-1.0, 0.5, 0.0));
    assert_eq!(parser.vertices[2], Tuple4D::point( 1.0, 0.0, 0.0));
    assert_eq!(parser.vertices[3], Tuple4D::point( 1.0, 1.0, 0.0));
}

#[test]
fn parsing_triangle_faces() {
    let (parser, shapes) = parse_source("v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\n\nf 1 2 3\nf 1 3 4\n");

    let g = parser.group("").unwrap();
    let children = shapes.children(g);
    let v = &parser.vertices;

    assert_eq!(triangle_points(&shapes, children[0]), (v[0], v[1], v[2]));
    assert_eq!(triangle_points(&shapes, children[1]), (v[0], v[2], v[3]));
}

#[test]
fn triangulating_polygons() {
    let (parser, shapes) = parse_source(
        "v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\nv 0 2 0\n\nf 1 2 3 4 5\n");

    let g = parser.group("").unwrap();
    let children = shapes.children(g);
    let v = &parser.vertices;

    assert_eq!(children.len(), 3);
    assert_eq!(triangle_points(&shapes, children[0]), (v[0], v[1], v[2]));
    assert_eq!(triangle_points(&shapes, children[1]), (v[0], v[2], v[3]));
    assert_eq!(triangle_points(&shapes, children[2]), (v[0], v[3], v[4]));
}

#[test]
fn triangles_in_groups() {
    let (parser, shapes) = parse_source(
        "v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\n\
         g FirstGroup\nf 1 2 3\ng SecondGroup\nf 1 3 4\n");
    let v = &parser.vertices;

    let g1 = parser.group("FirstGroup").unwrap();
    let g2 = parser.group("SecondGroup").unwrap();
    assert_eq!(triangle_points(&shapes, shapes.children(g1)[0]), (v[0], v[1], v[2]));
    assert_eq!(triangle_points(&shapes, shapes.children(g2)[0]), (v[0], v[2], v[3]));
    assert!(parser.group("").is_none());
}

#[test]
fn converting_obj_file_to_group() {
    let mut shapes = ShapeArena::new();
    let mut parser = ObjParser::new();
    parser.parse(&mut shapes,
        "v -1 1 0\nv -1 0 0\nv 1 0 0\nv 1 1 0\n\
         g FirstGroup\nf 1 2 3\ng SecondGroup\nf 1 3 4\n").unwrap();

    let g1 = parser.group("FirstGroup").unwrap();
    let g2 = parser.group("SecondGroup").unwrap();
    let root = parser.into_group(&mut shapes);

    assert!(shapes.includes(root, g1));
    assert!(shapes.includes(root, g2));
    assert_eq!(shapes.children(root).len(), 2);
}

#[test]
fn vertex_normal_records() {
    let (parser, _) = parse_source("vn 0 0 1\nvn 0.707 0 -0.707\nvn 1 2 3\n");

    assert_eq!(parser.normals[0], Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(parser.normals[1], Tuple4D::vector(0.707, 0.0, -0.707));
    assert_eq!(parser.normals[2], Tuple4D::vector(1.0, 2.0, 3.0));
}

#[test]
fn faces_with_normals() {
    let (parser, shapes) = parse_source(
        "v 0 1 0\nv -1 0 0\nv 1 0 0\n\
         vn -1 0 0\nvn 1 0 0\nvn 0 1 0\n\
         f 1//3 2//1 3//2\nf 1/0/3 2/102/1 3/14/2\n");

    let g = parser.group("").unwrap();
    let children = shapes.children(g);

    match (&shapes[children[0]].kind, &shapes[children[1]].kind) {
        (ShapeKind::SmoothTriangle(t1), ShapeKind::SmoothTriangle(t2)) => {
            assert_eq!(t1.triangle.p1, parser.vertices[0]);
            assert_eq!(t1.triangle.p2, parser.vertices[1]);
            assert_eq!(t1.triangle.p3, parser.vertices[2]);
            assert_eq!(t1.n1, parser.normals[2]);
            assert_eq!(t1.n2, parser.normals[0]);
            assert_eq!(t1.n3, parser.normals[1]);
            assert_eq!(t1, t2);
        },
        _ => panic!("expected smooth triangles"),
    }
}

#[test]
fn malformed_numbers_are_errors() {
    let mut shapes = ShapeArena::new();
    let err = ObjParser::new().parse(&mut shapes, "v 1 0 0\nv 1 x 0\n").unwrap_err();

    match err {
        Error::Obj { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn out_of_range_faces_are_errors() {
    let mut shapes = ShapeArena::new();
    let err = ObjParser::new().parse(&mut shapes, "v 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 4\n");

    assert!(matches!(err, Err(Error::Obj { line: 4, .. })));
}

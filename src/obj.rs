use std::io::{ self, prelude::* };
use std::path::{ Path, PathBuf };
use std::fs::File;

use log::debug;
use thiserror::Error;

use crate::tuple::{ Point, Vector3D };
use crate::mesh::{ Face, Model };

/// Errors raised while reading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to read line {line} of {path}: {source}")]
    Read { path: PathBuf, line: usize, source: io::Error },
}

/// A parser for OBJ files.
///
/// Only vertex (`v`) and face (`f`) records are understood. Every vertex is
/// scaled by `scale` and then moved by `offset` as it is read.
#[derive(Clone, Debug)]
pub struct ObjParser {
    pub path: PathBuf,
    pub offset: Vector3D,
    pub scale: f64,
    pub ignored_lines: usize,

    pub vertices: Vec<Point>,
    pub faces: Vec<Face>,
}

impl ObjParser {
    /// Creates a new `ObjParser` to parse the OBJ file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> ObjParser {
        ObjParser {
            path: path.as_ref().into(),
            offset: Vector3D::ZERO,
            scale: 1.0,
            ignored_lines: 0,

            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: Vector3D) -> ObjParser {
        self.offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> ObjParser {
        self.scale = scale;
        self
    }

    /// Parses an OBJ file.
    ///
    /// Unsupported or malformed commands are ignored. Each ignored command
    /// increments `ignored_lines` by 1. Blank lines and comments are skipped
    /// without being counted.
    ///
    /// Lines need not be valid UTF-8; undecodable bytes are replaced before
    /// the line is parsed.
    pub fn parse(&mut self) -> Result<(), ObjError> {
        let obj_file = File::open(&self.path).map_err(|source| ObjError::Open {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = io::BufReader::new(obj_file);
        let mut buf = Vec::new();
        let mut number = 0;

        loop {
            buf.clear();
            number += 1;

            let read = reader.read_until(b'\n', &mut buf)
                .map_err(|source| ObjError::Read {
                    path: self.path.clone(),
                    line: number,
                    source,
                })?;

            if read == 0 {
                break;
            }

            self.parse_line(&String::from_utf8_lossy(&buf));
        }

        Ok(())
    }

    /// Parses one line of an OBJ file.
    ///
    /// A sample OBJ file may look like the following:
    ///
    /// ```obj
    /// # a unit square
    /// v 0 0 0
    /// v 1 0 0
    /// v 1 1 0
    /// v 0 1 0
    ///
    /// f 1 2 3 4
    /// ```
    ///
    /// `v x y z` specifies a **v**ertex. `f i1 i2 i3 ...` specifies a
    /// **f**ace by one-based indices into the vertices read so far; the
    /// `i/t/n` form is accepted and only its vertex index is used.
    pub fn parse_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let mut params = line.split_whitespace();
        let parsed = match params.next() {
            Some("v") => self.parse_vertex(params),
            Some("f") => self.parse_face(params),
            _ => false,
        };

        if !parsed {
            debug!("Ignoring OBJ line in {}: {:?}", self.path.display(), line);
            self.ignored_lines += 1;
        }
    }

    fn parse_vertex<'a, I>(&mut self, params: I) -> bool
        where I: Iterator<Item = &'a str> {
        let parsed = params.map(str::parse::<f64>).collect::<Result<Vec<_>, _>>();
        let coords = match parsed {
            Ok(coords) => coords,
            Err(_) => return false,
        };

        if coords.len() < 3 {
            return false;
        }

        let scaled = Vector3D::new(coords[0], coords[1], coords[2]) * self.scale;
        self.vertices.push(Point::ORIGIN + scaled + self.offset);
        true
    }

    fn parse_face<'a, I>(&mut self, params: I) -> bool
        where I: Iterator<Item = &'a str> {
        let mut vertices = Vec::new();

        for param in params {
            // Only the vertex index of `v/vt/vn` is of interest.
            let index = match param.split('/').next().map(str::parse::<usize>) {
                Some(Ok(index)) => index,
                _ => return false,
            };

            // Indices are one-based and may only refer to vertices already
            // read.
            if index == 0 || index > self.vertices.len() {
                return false;
            }

            vertices.push(self.vertices[index - 1]);
        }

        if vertices.len() < 3 {
            return false;
        }

        self.faces.push(Face::new(vertices));
        true
    }

    /// Consumes the parser, producing a model from the parsed faces.
    pub fn into_model(self) -> Model {
        Model::new(self.faces)
    }
}

#[test]
fn ignoring_unrecognized_lines() {
    let mut obj_parser = ObjParser::new("./models/gibberish.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.ignored_lines, 5);
    assert!(obj_parser.vertices.is_empty());
}

#[test]
fn vertex_records() {
    let mut obj_parser = ObjParser::new("./models/vertices.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.vertices[0], Point::new(-1.0, 1.0, 0.0));
    assert_eq!(obj_parser.vertices[1], Point::new(-1.0, 0.5, 0.0));
    assert_eq!(obj_parser.vertices[2], Point::new( 1.0, 0.0, 0.0));
    assert_eq!(obj_parser.vertices[3], Point::new( 1.0, 1.0, 0.0));
}

#[test]
fn vertex_records_are_scaled_then_offset() {
    let mut obj_parser = ObjParser::new("./models/vertices.obj")
        .with_scale(2.0)
        .with_offset(Vector3D::new(10.0, 0.0, -1.0));
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.vertices[1], Point::new(8.0, 1.0, -1.0));
}

#[test]
fn parsing_faces() {
    let mut obj_parser = ObjParser::new("./models/vertices-and-faces.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.faces.len(), 2);

    let f1 = obj_parser.faces[0].vertices();
    let f2 = obj_parser.faces[1].vertices();

    assert_eq!(f1, &obj_parser.vertices[0..3]);
    assert_eq!(f2[0], obj_parser.vertices[0]);
    assert_eq!(f2[1], obj_parser.vertices[2]);
    assert_eq!(f2[2], obj_parser.vertices[3]);
}

#[test]
fn polygons_keep_all_vertices() {
    let mut obj_parser = ObjParser::new("./models/vertices-and-polygon.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.faces.len(), 1);
    assert_eq!(obj_parser.faces[0].vertices().len(), 5);
}

#[test]
fn faces_with_texture_and_normal_indices() {
    let mut obj_parser = ObjParser::new("./models/faces-with-normals.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.faces.len(), 2);
    assert_eq!(obj_parser.faces[0], obj_parser.faces[1]);
}

#[test]
fn non_utf8_comments_do_not_stop_parsing() {
    let mut obj_parser = ObjParser::new("./models/latin1-comment.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.vertices.len(), 3);
    assert_eq!(obj_parser.faces.len(), 1);
    assert_eq!(obj_parser.ignored_lines, 0);
}

#[test]
fn bad_faces_are_ignored() {
    let mut obj_parser = ObjParser::new("./models/vertices.obj");
    obj_parser.parse().unwrap();

    obj_parser.parse_line("f 1 2 9");
    obj_parser.parse_line("f 0 1 2");
    obj_parser.parse_line("f 1 2");
    obj_parser.parse_line("f 1 two 3");
    obj_parser.parse_line("v 1.0 nope 2.0");

    assert!(obj_parser.faces.is_empty());
    assert_eq!(obj_parser.ignored_lines, 5);
}

#[test]
fn missing_file_is_an_error() {
    let mut obj_parser = ObjParser::new("./models/does-not-exist.obj");

    match obj_parser.parse() {
        Err(ObjError::Open { .. }) => (),
        other => panic!("expected open error, got {:?}", other),
    }
}

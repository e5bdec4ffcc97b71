/// Parser for line-oriented vertex/face surface files
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{eof, opt},
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};
use tracing::{info, instrument};

use crate::error::{FacetError, Result};

/// Raw vertex and face lists read from a surface file.
///
/// Face indices are 0-based. [`parse_surface`] checks them against
/// `vertices`; records built by hand are checked again when triangulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceRecords {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Vec<usize>>,
}

impl SurfaceRecords {
    /// Number of sides of the largest face.
    pub fn largest_face(&self) -> usize {
        self.faces.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Parse `v x y z` and `f i j k ...` records.
///
/// Face indices are 1-based; negative indices count back from the most
/// recently read vertex. Only the position part of `i/t/n` tokens is used.
/// Any other record is ignored. A malformed vertex or face record fails the
/// whole parse.
#[instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_surface(input: &str) -> Result<SurfaceRecords> {
    let mut records = SurfaceRecords::default();
    let mut face_lines = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line_number = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, vertex) = vertex_record(line).map_err(|_| FacetError::Parse {
                    line: line_number,
                    message: format!("malformed vertex record `{line}`"),
                })?;
                if !vertex.iter().all(|c| c.is_finite()) {
                    return Err(FacetError::Parse {
                        line: line_number,
                        message: format!("vertex record `{line}` has a non-finite coordinate"),
                    });
                }
                records.vertices.push(vertex);
            }
            Some("f") => {
                let (_, raw_indices) = face_record(line).map_err(|_| FacetError::Parse {
                    line: line_number,
                    message: format!("malformed face record `{line}`"),
                })?;
                if raw_indices.len() < 3 {
                    return Err(FacetError::Parse {
                        line: line_number,
                        message: format!(
                            "face has {} indices, at least 3 are required",
                            raw_indices.len()
                        ),
                    });
                }
                let face = raw_indices
                    .iter()
                    .map(|&index| resolve_index(index, records.vertices.len(), line_number))
                    .collect::<Result<Vec<_>>>()?;
                records.faces.push(face);
                face_lines.push(line_number);
            }
            _ => {}
        }
    }

    // positive indices may refer to vertices defined further down the file
    let vertex_count = records.vertices.len();
    for (face, &line) in records.faces.iter().zip(&face_lines) {
        if let Some(&index) = face.iter().find(|&&index| index >= vertex_count) {
            return Err(FacetError::IndexOutOfRange {
                line,
                index: index as i64 + 1,
                vertex_count,
            });
        }
    }

    info!(
        vertices = records.vertices.len(),
        faces = records.faces.len(),
        "parsed surface"
    );
    Ok(records)
}

/// Read and parse a surface file.
pub fn read_surface(path: &Path) -> Result<SurfaceRecords> {
    let text = std::fs::read_to_string(path).map_err(|source| FacetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_surface(&text)
}

fn resolve_index(index: i64, vertices_so_far: usize, line: usize) -> Result<usize> {
    match index {
        0 => Err(FacetError::Parse {
            line,
            message: "face index 0 is not valid, indices start at 1".to_string(),
        }),
        i if i > 0 => Ok((i - 1) as usize),
        i => {
            let back = i.unsigned_abs() as usize;
            vertices_so_far
                .checked_sub(back)
                .ok_or_else(|| FacetError::IndexOutOfRange {
                    line,
                    index,
                    vertex_count: vertices_so_far,
                })
        }
    }
}

fn vertex_record(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(space1, double)(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    // optional homogeneous weight
    let (input, _) = opt(preceded(space1, double))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, _) = tag("f")(input)?;
    let (input, indices) = many1(preceded(space1, face_index))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, indices))
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only `i` is kept.
fn face_index(input: &str) -> IResult<&str, i64> {
    terminated(
        integer,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_triangle() {
        let records = parse_surface("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(records.vertices.len(), 3);
        assert_eq!(records.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(records.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_unknown_records_are_ignored() {
        let input = "# comment\no thing\nvn 0 0 1\nvt 0.5 0.5\ng group\nusemtl red\n\nv 0 0 0\nv 1 0 0\nv 0 1 0\ns off\nf 1 2 3\n";
        let records = parse_surface(input).unwrap();
        assert_eq!(records.vertices.len(), 3);
        assert_eq!(records.faces.len(), 1);
    }

    #[test]
    fn test_slash_tokens_and_weights() {
        let input = "v 0 0 0 1\nv 1 0 0 1\nv 0 1 0 1\nf 1/1/1 2//2 3/3\n";
        let records = parse_surface(input).unwrap();
        assert_eq!(records.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\nv 6 5 5\nv 5 6 5\nf -3 -2 -1\n";
        let records = parse_surface(input).unwrap();
        assert_eq!(records.faces, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_polygon_face() {
        let input = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let records = parse_surface(input).unwrap();
        assert_eq!(records.largest_face(), 4);
    }

    #[test]
    fn test_crlf_and_tabs() {
        let input = "v\t0 0 0\r\nv 1\t0 0\r\nv 0 1 0\r\nf 1 2 3\r\n";
        let records = parse_surface(input).unwrap();
        assert_eq!(records.faces.len(), 1);
    }

    #[test]
    fn test_malformed_vertex_reports_line() {
        let err = parse_surface("v 0 0 0\nv 1 zero 0\n").unwrap_err();
        assert!(matches!(err, FacetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let err = parse_surface("v 0 0 0\nv NaN NaN NaN\nv 0 1 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, FacetError::Parse { line: 2, .. }));

        let err = parse_surface("v inf 0 0\n").unwrap_err();
        assert!(matches!(err, FacetError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_short_face_is_rejected() {
        let err = parse_surface("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, FacetError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_out_of_range_index() {
        let err = parse_surface("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap_err();
        assert!(matches!(
            err,
            FacetError::IndexOutOfRange {
                line: 4,
                index: 9,
                vertex_count: 3
            }
        ));

        let err = parse_surface("v 0 0 0\nf -1 -2 -3\n").unwrap_err();
        assert!(matches!(err, FacetError::IndexOutOfRange { line: 2, .. }));
    }

    #[test]
    fn test_zero_index_is_rejected() {
        let err = parse_surface("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, FacetError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_surface(Path::new("/nonexistent/surface.obj")).unwrap_err();
        assert!(matches!(err, FacetError::Io { .. }));
    }
}

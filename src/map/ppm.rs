//! PPM map decoding.
//!
//! Maps are PPM images: black pixels are free space, any non-black pixel is
//! an obstacle or wall. Both the binary (`P6`) and ASCII (`P3`) variants are
//! accepted; `#` comments in the header are skipped.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::GridMap;

/// Map loading errors.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a PPM image (magic {0:?})")]
    BadMagic(String),

    #[error("malformed PPM header: {0}")]
    BadHeader(&'static str),

    #[error("pixel data truncated (expected {expected} samples, found {found})")]
    Truncated { expected: usize, found: usize },
}

/// Load an occupancy map from a PPM file.
pub fn load_map(path: impl AsRef<Path>) -> Result<GridMap, MapError> {
    decode(&fs::read(path)?)
}

/// Decode a PPM image into an occupancy map.
pub fn decode(bytes: &[u8]) -> Result<GridMap, MapError> {
    let mut tokens = Tokenizer::new(bytes);

    let magic = tokens
        .next_token()
        .ok_or(MapError::BadHeader("missing magic"))?;
    let binary = match magic {
        b"P6" => true,
        b"P3" => false,
        other => return Err(MapError::BadMagic(String::from_utf8_lossy(other).into())),
    };

    let width = tokens.next_usize("missing width")?;
    let height = tokens.next_usize("missing height")?;
    let maxval = tokens.next_usize("missing maxval")?;
    if width == 0 || height == 0 {
        return Err(MapError::BadHeader("zero image dimension"));
    }
    if maxval == 0 || maxval > 255 {
        return Err(MapError::BadHeader("unsupported maxval"));
    }

    let expected = width * height * 3;
    let mut cells = Vec::with_capacity(width * height);

    if binary {
        // Raster starts one whitespace byte after the maxval token
        let data = &bytes[(tokens.pos + 1).min(bytes.len())..];
        if data.len() < expected {
            return Err(MapError::Truncated {
                expected,
                found: data.len(),
            });
        }
        for pixel in data[..expected].chunks_exact(3) {
            cells.push(pixel.iter().any(|&b| b != 0));
        }
    } else {
        for _ in 0..width * height {
            let mut occupied = false;
            for _ in 0..3 {
                let sample = tokens.next_usize("truncated ASCII raster").map_err(|_| {
                    MapError::Truncated {
                        expected,
                        found: cells.len() * 3,
                    }
                })?;
                occupied |= sample != 0;
            }
            cells.push(occupied);
        }
    }

    Ok(GridMap::from_cells(width, height, cells))
}

/// Whitespace/comment-aware tokenizer over a PPM header.
struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos < self.bytes.len() && self.bytes[self.pos] == b'#' {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Some(&self.bytes[start..self.pos])
    }

    fn next_usize(&mut self, what: &'static str) -> Result<usize, MapError> {
        let token = self.next_token().ok_or(MapError::BadHeader(what))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(MapError::BadHeader(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ObstacleMap;
    use std::io::Write;

    fn p6_image(width: usize, height: usize, pixels: &[[u8; 3]]) -> Vec<u8> {
        let mut bytes = format!("P6\n{} {}\n255\n", width, height).into_bytes();
        for p in pixels {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    #[test]
    fn test_decode_p6() {
        // 2x2: black, white, red, black
        let bytes = p6_image(
            2,
            2,
            &[[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 0, 0]],
        );
        let map = decode(&bytes).unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 2);
        assert!(!map.cell(0, 0));
        assert!(map.cell(1, 0));
        assert!(map.cell(0, 1));
        assert!(!map.cell(1, 1));
    }

    #[test]
    fn test_decode_p3() {
        let text = "P3\n# a comment\n2 1\n255\n0 0 0  12 0 0\n";
        let map = decode(text.as_bytes()).unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 1);
        assert!(!map.cell(0, 0));
        assert!(map.cell(1, 0));
    }

    #[test]
    fn test_decode_header_comment() {
        let bytes = p6_image(1, 1, &[[0, 0, 0]]);
        let commented = {
            let mut v = b"P6\n# map fixture\n1 1\n255\n".to_vec();
            v.extend_from_slice(&[0, 0, 0]);
            v
        };
        assert_eq!(decode(&bytes).unwrap().cell(0, 0), false);
        assert_eq!(decode(&commented).unwrap().cell(0, 0), false);
    }

    #[test]
    fn test_decode_near_black_is_obstacle() {
        // Any non-zero channel counts as an obstacle
        let bytes = p6_image(1, 1, &[[0, 1, 0]]);
        assert!(decode(&bytes).unwrap().cell(0, 0));
    }

    #[test]
    fn test_reject_bad_magic() {
        let err = decode(b"P5\n2 2\n255\n").unwrap_err();
        assert!(matches!(err, MapError::BadMagic(_)));
    }

    #[test]
    fn test_reject_truncated_raster() {
        let mut bytes = p6_image(2, 2, &[[0, 0, 0]]);
        bytes.truncate(bytes.len() - 1);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, MapError::Truncated { .. }));
    }

    #[test]
    fn test_reject_missing_dimensions() {
        let err = decode(b"P6\n").unwrap_err();
        assert!(matches!(err, MapError::BadHeader(_)));
    }

    #[test]
    fn test_reject_zero_dimension() {
        let err = decode(b"P3\n0 4\n255\n").unwrap_err();
        assert!(matches!(err, MapError::BadHeader(_)));
    }

    #[test]
    fn test_load_map_from_file() {
        let bytes = p6_image(2, 1, &[[0, 0, 0], [255, 255, 255]]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let map = load_map(file.path()).unwrap();
        assert_eq!(map.width(), 2);
        assert!(map.is_obstacle(1.5, 0.5));
        assert!(!map.is_obstacle(0.5, 0.5));
    }

    #[test]
    fn test_load_map_missing_file() {
        let err = load_map("/nonexistent/map.ppm").unwrap_err();
        assert!(matches!(err, MapError::Io(_)));
    }
}

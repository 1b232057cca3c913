use std::collections::HashMap;

use foundation::math::Vec2;
use serde::Deserialize;

/// Segments used to flatten each quadratic/cubic outline curve.
const CURVE_SEGMENTS: usize = 10;

/// A baked glyph-outline font resource (typeface-style JSON, produced by the
/// external font-subset build tool from the collected region names).
///
/// Outlines are flattened to polygonal contours at parse time; consumers only
/// ever see straight segments, in font units.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: Option<String>,
    /// Font units per em square.
    pub units_per_em: f64,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub advance: f64,
    /// Flattened closed contours in font units.
    pub contours: Vec<Vec<Vec2>>,
}

#[derive(Debug)]
pub enum FontError {
    Parse(String),
    BadOutline { glyph: char, reason: String },
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::Parse(reason) => write!(f, "font parse error: {reason}"),
            FontError::BadOutline { glyph, reason } => {
                write!(f, "bad outline for glyph {glyph:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for FontError {}

#[derive(Debug, Deserialize)]
struct FontFile {
    #[serde(rename = "familyName")]
    family_name: Option<String>,
    resolution: Option<f64>,
    glyphs: HashMap<String, GlyphEntry>,
}

#[derive(Debug, Deserialize)]
struct GlyphEntry {
    ha: f64,
    o: Option<String>,
}

impl Font {
    pub fn from_json_str(payload: &str) -> Result<Self, FontError> {
        let file: FontFile =
            serde_json::from_str(payload).map_err(|e| FontError::Parse(e.to_string()))?;

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, entry) in file.glyphs {
            let Some(ch) = key.chars().next() else {
                continue;
            };
            let contours = match entry.o.as_deref() {
                Some(outline) => flatten_outline(ch, outline)?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: entry.ha,
                    contours,
                },
            );
        }

        Ok(Self {
            family: file.family_name,
            units_per_em: file.resolution.unwrap_or(1000.0),
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// World units per font unit for the requested text size.
    pub fn scale_for(&self, size: f64) -> f64 {
        size / self.units_per_em
    }
}

/// Flatten one glyph outline program into closed polygonal contours.
///
/// Command stream, typeface convention: `m x y` starts a contour, `l x y`
/// adds a segment, `q x y cx cy` is a quadratic to `(x, y)` via one control
/// point, `b x y cx1 cy1 cx2 cy2` a cubic via two. Contours close implicitly
/// at the next `m` or at end of stream.
fn flatten_outline(glyph: char, outline: &str) -> Result<Vec<Vec<Vec2>>, FontError> {
    fn bad(glyph: char, reason: impl Into<String>) -> FontError {
        FontError::BadOutline {
            glyph,
            reason: reason.into(),
        }
    }

    let tokens: Vec<&str> = outline.split_whitespace().collect();
    let mut pos = 0usize;
    let coord = |pos: &mut usize| -> Result<f64, FontError> {
        let token = tokens
            .get(*pos)
            .ok_or_else(|| bad(glyph, "truncated command"))?;
        *pos += 1;
        token
            .parse()
            .map_err(|_| bad(glyph, "non-numeric coordinate"))
    };

    let mut contours: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    while pos < tokens.len() {
        let op = tokens[pos];
        pos += 1;
        match op {
            "m" => {
                if current.len() >= 3 {
                    contours.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                let x = coord(&mut pos)?;
                let y = coord(&mut pos)?;
                current.push(Vec2::new(x, y));
            }
            "l" => {
                let x = coord(&mut pos)?;
                let y = coord(&mut pos)?;
                current.push(Vec2::new(x, y));
            }
            "q" => {
                let end = Vec2::new(coord(&mut pos)?, coord(&mut pos)?);
                let ctrl = Vec2::new(coord(&mut pos)?, coord(&mut pos)?);
                let start = *current
                    .last()
                    .ok_or_else(|| bad(glyph, "curve before move"))?;
                for step in 1..=CURVE_SEGMENTS {
                    let t = step as f64 / CURVE_SEGMENTS as f64;
                    current.push(quadratic_at(start, ctrl, end, t));
                }
            }
            "b" => {
                let end = Vec2::new(coord(&mut pos)?, coord(&mut pos)?);
                let c1 = Vec2::new(coord(&mut pos)?, coord(&mut pos)?);
                let c2 = Vec2::new(coord(&mut pos)?, coord(&mut pos)?);
                let start = *current
                    .last()
                    .ok_or_else(|| bad(glyph, "curve before move"))?;
                for step in 1..=CURVE_SEGMENTS {
                    let t = step as f64 / CURVE_SEGMENTS as f64;
                    current.push(cubic_at(start, c1, c2, end, t));
                }
            }
            "z" => {
                // Explicit close; the implicit close below covers it.
            }
            other => {
                return Err(bad(glyph, format!("unknown outline command: {other}")));
            }
        }
    }

    if current.len() >= 3 {
        contours.push(current);
    }

    Ok(contours)
}

fn quadratic_at(p0: Vec2, c: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    Vec2::new(
        u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
    )
}

fn cubic_at(p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    Vec2::new(
        u * u * u * p0.x + 3.0 * u * u * t * c1.x + 3.0 * u * t * t * c2.x + t * t * t * p1.x,
        u * u * u * p0.y + 3.0 * u * u * t * c1.y + 3.0 * u * t * t * c2.y + t * t * t * p1.y,
    )
}

#[cfg(test)]
mod tests {
    use super::{Font, FontError};
    use pretty_assertions::assert_eq;

    const TINY_FONT: &str = r#"{
        "familyName": "Demo Sans",
        "resolution": 1000,
        "glyphs": {
            "A": { "ha": 600, "o": "m 0 0 l 500 0 l 250 700" },
            "o": { "ha": 550, "o": "m 100 0 l 450 0 l 450 400 l 100 400 m 200 100 l 350 100 l 350 300 l 200 300" },
            " ": { "ha": 300 }
        }
    }"#;

    #[test]
    fn parses_glyphs_and_metadata() {
        let font = Font::from_json_str(TINY_FONT).expect("parse");
        assert_eq!(font.family.as_deref(), Some("Demo Sans"));
        assert_eq!(font.units_per_em, 1000.0);
        assert_eq!(font.glyph_count(), 3);

        let a = font.glyph('A').expect("glyph A");
        assert_eq!(a.advance, 600.0);
        assert_eq!(a.contours.len(), 1);
        assert_eq!(a.contours[0].len(), 3);
    }

    #[test]
    fn inner_contours_stay_separate() {
        let font = Font::from_json_str(TINY_FONT).expect("parse");
        let o = font.glyph('o').expect("glyph o");
        assert_eq!(o.contours.len(), 2);
    }

    #[test]
    fn whitespace_glyph_has_no_contours() {
        let font = Font::from_json_str(TINY_FONT).expect("parse");
        assert!(font.glyph(' ').expect("space").contours.is_empty());
    }

    #[test]
    fn curves_are_flattened() {
        let payload = r#"{
            "glyphs": { "c": { "ha": 500, "o": "m 0 0 l 100 0 q 100 100 100 0" } }
        }"#;
        let font = Font::from_json_str(payload).expect("parse");
        let c = font.glyph('c').expect("glyph c");
        // 2 line points + 10 curve samples.
        assert_eq!(c.contours[0].len(), 12);
        let last = *c.contours[0].last().unwrap();
        assert_eq!((last.x, last.y), (100.0, 100.0));
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let payload = r#"{ "glyphs": { "x": { "ha": 1, "o": "m 0 0 w 1 2" } } }"#;
        let err = Font::from_json_str(payload).unwrap_err();
        assert!(matches!(err, FontError::BadOutline { glyph: 'x', .. }));
    }

    #[test]
    fn default_resolution_is_1000() {
        let font = Font::from_json_str(r#"{ "glyphs": {} }"#).expect("parse");
        assert_eq!(font.units_per_em, 1000.0);
    }
}

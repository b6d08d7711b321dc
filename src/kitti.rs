//! KITTI annotation lines
//!
//! A KITTI label line holds 15 fields separated by single spaces:
//! `class truncated occluded alpha x1 y1 x2 y2 h w l x y z rotation_y`.
//! Only the 2D box corners (fields 4..8) depend on the image resolution.

use std::ops::Range;

use crate::types::ScaleFactors;

/// Positions of `x1 y1 x2 y2` within a line
pub const BBOX_FIELDS: Range<usize> = 4..8;

/// Minimum field count for a line to carry a bounding box
pub const MIN_FIELDS: usize = BBOX_FIELDS.end;

const FIELD_SEPARATOR: char = ' ';

/// Why a single line could not be rescaled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    TooFewFields { found: usize },
    InvalidCoordinate { field: usize, value: String },
}

/// One line of a KITTI file, borrowed from the file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KittiLine<'a> {
    fields: Vec<&'a str>,
    terminator: &'a str,
}

impl<'a> KittiLine<'a> {
    /// Split a raw line (as produced by `str::split_inclusive('\n')`) into
    /// fields and its line terminator.
    pub fn parse(raw: &'a str) -> Self {
        let (content, terminator) = split_terminator(raw);
        Self {
            fields: content.split(FIELD_SEPARATOR).collect(),
            terminator,
        }
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn terminator(&self) -> &'a str {
        self.terminator
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.trim().is_empty())
    }

    /// The box corners `[x1, y1, x2, y2]` in the line's pixel space
    pub fn bbox(&self) -> Result<[f64; 4], LineError> {
        if self.fields.len() < MIN_FIELDS {
            return Err(LineError::TooFewFields {
                found: self.fields.len(),
            });
        }

        let mut bbox = [0.0; 4];
        for (slot, index) in bbox.iter_mut().zip(BBOX_FIELDS) {
            let raw = self.fields[index];
            *slot = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| LineError::InvalidCoordinate {
                    field: index,
                    value: raw.to_string(),
                })?;
        }
        Ok(bbox)
    }

    /// Render the line with its box corners rescaled, keeping every other
    /// field and the original terminator untouched.
    pub fn rescale(&self, scale: &ScaleFactors) -> Result<String, LineError> {
        let [x1, y1, x2, y2] = self.bbox()?;
        let scaled = [
            format_coordinate(scale.scale_x(x1)),
            format_coordinate(scale.scale_y(y1)),
            format_coordinate(scale.scale_x(x2)),
            format_coordinate(scale.scale_y(y2)),
        ];

        let mut out = String::with_capacity(self.len_hint() + 16);
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                out.push(FIELD_SEPARATOR);
            }
            if BBOX_FIELDS.contains(&index) {
                out.push_str(&scaled[index - BBOX_FIELDS.start]);
            } else {
                out.push_str(field);
            }
        }
        out.push_str(self.terminator);
        Ok(out)
    }

    fn len_hint(&self) -> usize {
        self.fields.iter().map(|f| f.len() + 1).sum::<usize>() + self.terminator.len()
    }
}

/// Format a coordinate as shortest round-trip decimal text with a
/// mandatory fractional part, e.g. `5.0` or `15.25`.
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent notation
/// with a signed exponent of at least two digits (`1e-05`, `2.5e+16`), and
/// NaN is written as `nan`.
pub fn format_coordinate(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(content) = raw.strip_suffix("\r\n") {
        (content, &raw[content.len()..])
    } else if let Some(content) = raw.strip_suffix('\n') {
        (content, &raw[content.len()..])
    } else {
        (raw, "")
    }
}

// Areas module - Named rectangle geometry for hit testing and placement
//
// An AreaTable keeps two copies of its rectangles:
// - base: defined once, in the native pixel space of the image it describes
// - scaled: derived from base for the current presenting surface size
//
// The scaled copy is always recomputed from the base copy so repeated resizes
// never accumulate rounding error. Insertion order is preserved and decides
// which region wins when rectangles overlap.

pub mod regions;

pub use hit_test::HitTester;
pub use regions::{ControllerArea, EmulatorArea, Region};

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Errors that can occur while building or loading an area table
#[derive(Debug)]
pub enum AreaError {
    /// I/O error
    Io(io::Error),

    /// JSON parsing error
    Parse(serde_json::Error),

    /// A rectangle has unordered or non-finite edges
    InvalidRect(u32),

    /// The same region id was defined twice
    DuplicateRegion(u32),

    /// The table's base size is not a positive finite size
    InvalidSize,
}

impl fmt::Display for AreaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaError::Io(e) => write!(f, "I/O error: {}", e),
            AreaError::Parse(e) => write!(f, "Area table parse error: {}", e),
            AreaError::InvalidRect(id) => write!(f, "Area {} has an invalid rectangle", id),
            AreaError::DuplicateRegion(id) => write!(f, "Area {} is defined more than once", id),
            AreaError::InvalidSize => write!(f, "Area table size must be positive"),
        }
    }
}

impl std::error::Error for AreaError {}

impl From<io::Error> for AreaError {
    fn from(e: io::Error) -> Self {
        AreaError::Io(e)
    }
}

impl From<serde_json::Error> for AreaError {
    fn from(e: serde_json::Error) -> Self {
        AreaError::Parse(e)
    }
}

/// On-disk JSON form of an area table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaTableFile {
    /// Width of the image the rectangles are defined against
    pub width: f32,
    /// Height of the image the rectangles are defined against
    pub height: f32,
    /// Areas in hit-test priority order
    pub areas: Vec<AreaEntry>,
}

/// One area in an `AreaTableFile`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEntry {
    pub id: u32,
    /// Human-readable label; not used for lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `[left, top, right, bottom]`
    pub rect: [f32; 4],
}

/// Region id → rectangle mapping with a scaled copy for the display surface
#[derive(Debug, Clone, PartialEq)]
pub struct AreaTable {
    base_size: Size,
    scaled_size: Size,
    base: Vec<(u32, Rect)>,
    scaled: Vec<(u32, Rect)>,
}

impl AreaTable {
    /// Create an empty table for an image of `base_size`
    pub fn new(base_size: Size) -> Self {
        AreaTable {
            base_size,
            scaled_size: base_size,
            base: Vec::new(),
            scaled: Vec::new(),
        }
    }

    /// Build a table from every variant of a region enum, in declaration order
    pub fn from_regions<R: Region>(base_size: Size) -> Self {
        let base: Vec<(u32, Rect)> = R::ALL.iter().map(|r| (r.id(), r.rect())).collect();
        AreaTable {
            base_size,
            scaled_size: base_size,
            scaled: base.clone(),
            base,
        }
    }

    /// Parse a table from its JSON form
    ///
    /// # Arguments
    /// * `json` - Text of an `AreaTableFile`
    ///
    /// # Returns
    /// The table, or an error for malformed JSON, invalid rectangles or duplicate ids
    pub fn from_json(json: &str) -> Result<Self, AreaError> {
        let file: AreaTableFile = serde_json::from_str(json)?;
        let size = Size::new(file.width, file.height);
        if size.is_empty() {
            return Err(AreaError::InvalidSize);
        }

        let mut table = AreaTable::new(size);
        for entry in file.areas {
            let [left, top, right, bottom] = entry.rect;
            table.insert(entry.id, Rect::new(left, top, right, bottom))?;
        }
        Ok(table)
    }

    /// Load a table from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, AreaError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let table = Self::from_json(&contents)?;
        log::debug!(
            "Loaded {} area(s) from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Serialize the base geometry to JSON
    pub fn to_json(&self) -> Result<String, AreaError> {
        let file = AreaTableFile {
            width: self.base_size.width,
            height: self.base_size.height,
            areas: self
                .base
                .iter()
                .map(|(id, r)| AreaEntry {
                    id: *id,
                    name: None,
                    rect: [r.left, r.top, r.right, r.bottom],
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Append an area
    ///
    /// The scaled copy is rebuilt for the current scaled size.
    pub fn insert(&mut self, id: u32, rect: Rect) -> Result<(), AreaError> {
        if !rect.is_valid() {
            return Err(AreaError::InvalidRect(id));
        }
        if self.base.iter().any(|(existing, _)| *existing == id) {
            return Err(AreaError::DuplicateRegion(id));
        }

        self.base.push((id, rect));
        self.rescale(self.scaled_size);
        Ok(())
    }

    /// Recompute the scaled areas for a surface of `new_size`
    ///
    /// Each rectangle becomes `base * (new_size / base_size)`, independently in
    /// X and Y. Non-finite sizes, or a table without a usable base size, leave
    /// the scaled copy equal to the base copy.
    pub fn rescale(&mut self, new_size: Size) {
        let usable = !self.base_size.is_empty()
            && new_size.width.is_finite()
            && new_size.height.is_finite();

        let (x_ratio, y_ratio) = if usable {
            (
                new_size.width / self.base_size.width,
                new_size.height / self.base_size.height,
            )
        } else {
            log::warn!(
                "Cannot scale areas from {:?} to {:?}; using base geometry",
                self.base_size,
                new_size
            );
            (1.0, 1.0)
        };

        self.scaled_size = if usable { new_size } else { self.base_size };
        self.scaled = self
            .base
            .iter()
            .map(|(id, rect)| (*id, rect.scaled(x_ratio, y_ratio)))
            .collect();
    }

    pub fn base_size(&self) -> Size {
        self.base_size
    }

    pub fn scaled_size(&self) -> Size {
        self.scaled_size
    }

    /// Base areas in insertion order
    pub fn base_areas(&self) -> impl Iterator<Item = (u32, Rect)> + '_ {
        self.base.iter().copied()
    }

    /// Scaled areas in insertion order
    pub fn scaled_areas(&self) -> impl Iterator<Item = (u32, Rect)> + '_ {
        self.scaled.iter().copied()
    }

    pub fn base_rect(&self, id: u32) -> Option<Rect> {
        self.base.iter().find(|(i, _)| *i == id).map(|(_, r)| *r)
    }

    pub fn scaled_rect(&self, id: u32) -> Option<Rect> {
        self.scaled.iter().find(|(i, _)| *i == id).map(|(_, r)| *r)
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

//! Material palette: maps compact [`MaterialId`] values to identifiers and colours.
//!
//! The palette is a fixed table shared by the generators (which only use the
//! ids) and the blueprint renderer (which needs colours). Air is always ID 0
//! and never appears in the table, so it can never be painted.

use std::fmt;

use rustc_hash::FxHashMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored in every voxel cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Empty space. Never stored in a world.
    pub const AIR: Self = Self(0);
    /// Dressed stone blocks.
    pub const STONE_BRICK: Self = Self(1);
    /// White masonry used for walls and the tower.
    pub const WHITE_CONCRETE: Self = Self(2);
    /// Walkable ground.
    pub const GRASS_BLOCK: Self = Self(3);
    /// Rough stone: roads, cliffs and pillars.
    pub const STONE: Self = Self(4);
    /// Packed earth.
    pub const DIRT: Self = Self(5);
    /// Timber.
    pub const WOOD: Self = Self(6);
    /// Water.
    pub const WATER: Self = Self(7);
    /// Gilded trim.
    pub const GOLD_BLOCK: Self = Self(8);
    /// Railings and outlines.
    pub const WALL_OUTLINE: Self = Self(9);
    /// Riveted iron members.
    pub const IRON_LATTICE: Self = Self(10);

    /// Returns `true` for [`MaterialId::AIR`].
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// A 24-bit `0xRRGGBB` colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Builds a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// Colour used for any material the palette does not know.
pub const FALLBACK_COLOR: Rgb = Rgb(0xff00ff);

/// One row of the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Material id (index into the table plus one).
    pub id: MaterialId,
    /// Snake-case identifier, e.g. `"stone_brick"`.
    pub name: &'static str,
    /// Display colour.
    pub color: Rgb,
}

/// `(identifier, colour)` rows; row `i` has id `i + 1`.
const STANDARD_ENTRIES: &[(&str, Rgb)] = &[
    ("stone_brick", Rgb(0x787878)),
    ("white_concrete", Rgb(0xeeeeee)),
    ("grass_block", Rgb(0x5b8c47)),
    ("stone", Rgb(0x606060)),
    ("dirt", Rgb(0x795548)),
    ("wood", Rgb(0x8d6e63)),
    ("water", Rgb(0x4fc3f7)),
    ("gold_block", Rgb(0xffd700)),
    ("wall_outline", Rgb(0xb0bec5)),
    ("iron_lattice", Rgb(0x546e7a)),
];

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Maps [`MaterialId`] → identifier/colour with O(1) lookup by index and
/// O(1) reverse lookup by name.
#[derive(Clone, Debug)]
pub struct MaterialPalette {
    entries: Vec<PaletteEntry>,
    name_to_id: FxHashMap<&'static str, MaterialId>,
}

impl MaterialPalette {
    /// The fixed palette shared by the generators and the viewer.
    pub fn standard() -> Self {
        let entries: Vec<PaletteEntry> = STANDARD_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, &(name, color))| PaletteEntry {
                id: MaterialId(i as u16 + 1),
                name,
                color,
            })
            .collect();
        let name_to_id = entries.iter().map(|e| (e.name, e.id)).collect();
        Self {
            entries,
            name_to_id,
        }
    }

    /// All entries in id order.
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Number of materials (air excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the palette has no materials.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: MaterialId) -> Option<&PaletteEntry> {
        if id.is_air() {
            return None;
        }
        self.entries.get(id.0 as usize - 1)
    }

    /// Returns the id for an identifier, or `None` if not listed.
    pub fn lookup(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the identifier of a material, or `None` for air and unknown ids.
    pub fn name(&self, id: MaterialId) -> Option<&'static str> {
        self.entry(id).map(|e| e.name)
    }

    /// Returns the colour of a material, or [`FALLBACK_COLOR`] if unknown.
    pub fn color(&self, id: MaterialId) -> Rgb {
        self.entry(id).map_or(FALLBACK_COLOR, |e| e.color)
    }

    /// Colour lookup by identifier, falling back like [`color`](Self::color).
    pub fn color_by_name(&self, name: &str) -> Rgb {
        self.lookup(name).map_or(FALLBACK_COLOR, |id| self.color(id))
    }

    /// Human-readable name: `stone_brick` becomes `Stone Brick`.
    pub fn display_name(&self, id: MaterialId) -> String {
        self.name(id)
            .map_or_else(|| "Unknown".to_string(), title_case)
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self::standard()
    }
}

fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

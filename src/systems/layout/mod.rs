// city layout core
// everything in here is a pure function of (config, random source),
// the ECS side only ever reads the finished CityLayout

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::config::*;

pub mod cells;
pub mod curve;
pub mod divisions;
pub mod random;
pub mod rings;
pub mod river;

pub use cells::{generate_cells, CellExclusion};
pub use divisions::{compute_segments, generate_divisions};
pub use random::LayoutRng;
pub use rings::generate_rings;
pub use river::{generate_border_points, generate_river, generate_river_control_points};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("ring count must be at least 1")]
    ZeroRings,
    #[error("cell dimension must be positive, got {0}")]
    NonPositiveCellDim(f32),
    #[error("site dimension must be positive, got {0}")]
    NonPositiveBaseDim(f32),
    #[error("{name} must not be negative, got {value}")]
    NegativeTolerance { name: &'static str, value: f32 },
}

/// The square building site. The diagonal is always derived from `base_dim`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    base_dim: f32,
    base_diagonal: f32,
}

impl Site {
    pub fn new(base_dim: f32) -> Self {
        let half = base_dim / 2.0;
        Self {
            base_dim,
            base_diagonal: (2.0 * half * half).sqrt(),
        }
    }

    pub fn base_dim(&self) -> f32 {
        self.base_dim
    }

    /// distance from the center to a corner
    pub fn base_diagonal(&self) -> f32 {
        self.base_diagonal
    }

    pub fn half_dim(&self) -> f32 {
        self.base_dim / 2.0
    }

    /// 1 at the center, 0 at a corner
    pub fn density_at(&self, position: Vec3) -> f32 {
        (1.0 - position.length() / self.base_diagonal).clamp(0.0, 1.0)
    }
}

/// Layout generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub base_dim: f32,
    pub num_rings: usize,
    pub ring_points: usize,
    pub ring_width: f32,
    pub num_divisions: usize,
    pub division_width: f32,
    pub river_points: usize,
    pub cell_dim: f32,
    pub border_margin: f32,
    pub division_tolerance: f32,
    /// `None` falls back to `cell_dim`
    pub ring_tolerance: Option<f32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_dim: BASE_DIM,
            num_rings: NUM_RINGS,
            ring_points: RING_POINTS,
            ring_width: RING_WIDTH,
            num_divisions: NUM_DIVISIONS,
            division_width: DIVISION_WIDTH,
            river_points: RIVER_POINTS,
            cell_dim: CELL_DIM,
            border_margin: BORDER_MARGIN,
            division_tolerance: DIVISION_TOLERANCE,
            ring_tolerance: None,
        }
    }
}

impl LayoutConfig {
    pub fn site(&self) -> Site {
        Site::new(self.base_dim)
    }

    pub fn ring_tolerance(&self) -> f32 {
        self.ring_tolerance.unwrap_or(self.cell_dim)
    }

    /// radial distance between two neighbouring rings
    pub fn ring_spacing(&self) -> f32 {
        self.site().half_dim() / self.num_rings.max(1) as f32
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        // negated comparisons so NaN is rejected too
        if !(self.base_dim > 0.0) {
            return Err(LayoutError::NonPositiveBaseDim(self.base_dim));
        }
        if self.num_rings == 0 {
            return Err(LayoutError::ZeroRings);
        }
        if !(self.cell_dim > 0.0) {
            return Err(LayoutError::NonPositiveCellDim(self.cell_dim));
        }

        let tolerances = [
            ("border margin", Some(self.border_margin)),
            ("division tolerance", Some(self.division_tolerance)),
            ("ring tolerance", self.ring_tolerance),
        ];
        for (name, value) in tolerances {
            if let Some(value) = value {
                if !(value >= 0.0) {
                    return Err(LayoutError::NegativeTolerance { name, value });
                }
            }
        }

        Ok(())
    }
}

/// A short radial street between two neighbouring ring boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub ring_id: usize,
    pub slot: usize,
    pub point_a: Vec3,
    pub point_b: Vec3,
    pub angle: f32,
}

impl Division {
    pub fn midpoint(&self) -> Vec3 {
        (self.point_a + self.point_b) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.point_a.distance(self.point_b)
    }
}

/// Axis-aligned box on the layout plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    /// # Returns `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Bounding box spanning two cyclically adjacent divisions of one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: usize,
    pub radius: f32,
    pub outline: Vec<Vec3>,
    pub divisions: Vec<Division>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Light,
    Dark,
}

impl CellColor {
    pub fn flag(self) -> u8 {
        match self {
            CellColor::Light => 0,
            CellColor::Dark => 1,
        }
    }

    pub fn from_flag(flag: i32) -> Self {
        if flag == 0 { CellColor::Light } else { CellColor::Dark }
    }
}

/// A buildable plot that cleared every exclusion test.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub position: Vec3,
    pub density: f32,
    pub color: CellColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiverPath {
    /// border point, interior point, border point
    pub control_points: [Vec3; 3],
    pub samples: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityLayout {
    pub site: Site,
    pub rings: Vec<Ring>,
    pub cells: Vec<Cell>,
    pub river: RiverPath,
}

impl CityLayout {
    pub fn divisions(&self) -> impl Iterator<Item = &Division> {
        self.rings.iter().flat_map(|ring| ring.divisions.iter())
    }

    pub fn division_count(&self) -> usize {
        self.rings.iter().map(|ring| ring.divisions.len()).sum()
    }

    pub fn segment_count(&self) -> usize {
        self.rings.iter().map(|ring| ring.segments.len()).sum()
    }
}

/// Runs the whole pipeline: rings, divisions, cells, then the river.
/// All random draws come from `rng`, in that order.
pub fn generate_layout<R: LayoutRng + ?Sized>(
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<CityLayout, LayoutError> {
    config.validate()?;

    let site = config.site();
    let rings = generate_rings(config);
    let rings = generate_divisions(&rings, config, rng);
    let cells = generate_cells(&rings, config, rng);
    let river = generate_river(&site, config.river_points, rng);

    let layout = CityLayout { site, rings, cells, river };
    debug!(
        "layout generated: {} rings, {} divisions, {} cells",
        layout.rings.len(),
        layout.division_count(),
        layout.cells.len()
    );

    Ok(layout)
}

pub fn generate_seeded(config: &LayoutConfig, seed: u64) -> Result<CityLayout, LayoutError> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_layout(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_is_derived_from_dim() {
        let site = Site::new(200.0);
        assert!((site.base_diagonal() - 2.0_f32.sqrt() * 100.0).abs() < 1e-3);
        assert_eq!(site.half_dim(), 100.0);
    }

    #[test]
    fn density_falls_off_from_center() {
        let site = Site::new(200.0);
        assert_eq!(site.density_at(Vec3::ZERO), 1.0);
        assert!(site.density_at(Vec3::new(-100.0, -100.0, 0.0)) < 1e-4);
        assert!(site.density_at(Vec3::new(10.0, 0.0, 0.0)) > site.density_at(Vec3::new(20.0, 0.0, 0.0)));
    }

    #[test]
    fn zero_rings_fail_fast() {
        let config = LayoutConfig { num_rings: 0, ..default() };
        assert_eq!(config.validate(), Err(LayoutError::ZeroRings));
        assert_eq!(generate_seeded(&config, 1), Err(LayoutError::ZeroRings));
    }

    #[test]
    fn non_positive_cell_dim_fails_fast() {
        for cell_dim in [0.0, -7.0, f32::NAN] {
            let config = LayoutConfig { cell_dim, ..default() };
            assert!(matches!(config.validate(), Err(LayoutError::NonPositiveCellDim(_))));
        }
    }

    #[test]
    fn negative_tolerances_are_rejected() {
        let config = LayoutConfig { border_margin: -1.0, ..default() };
        assert!(matches!(
            config.validate(),
            Err(LayoutError::NegativeTolerance { name: "border margin", .. })
        ));

        let config = LayoutConfig { ring_tolerance: Some(-0.5), ..default() };
        assert!(matches!(
            config.validate(),
            Err(LayoutError::NegativeTolerance { name: "ring tolerance", .. })
        ));
    }

    #[test]
    fn zero_divisions_is_valid() {
        let config = LayoutConfig { num_divisions: 0, ..default() };
        let layout = generate_seeded(&config, 7).expect("valid config");
        assert_eq!(layout.division_count(), 0);
        assert_eq!(layout.segment_count(), 0);
        assert_eq!(layout.rings.len(), config.num_rings);
    }

    #[test]
    fn ring_tolerance_defaults_to_cell_dim() {
        let config = LayoutConfig::default();
        assert_eq!(config.ring_tolerance(), config.cell_dim);
        let config = LayoutConfig { ring_tolerance: Some(2.5), ..default() };
        assert_eq!(config.ring_tolerance(), 2.5);
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let points = [
            Vec2::new(1.0, -2.0),
            Vec2::new(-3.0, 4.0),
            Vec2::new(0.5, 0.5),
        ];
        let bbox = BoundingBox::from_points(&points).expect("non-empty");
        assert_eq!(bbox.min, Vec2::new(-3.0, -2.0));
        assert_eq!(bbox.max, Vec2::new(1.0, 4.0));
        assert!(points.iter().all(|p| bbox.contains(*p)));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn color_flag_round_trips() {
        assert_eq!(CellColor::from_flag(0).flag(), 0);
        assert_eq!(CellColor::from_flag(1).flag(), 1);
    }
}

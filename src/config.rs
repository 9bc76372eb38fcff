// Configuration file, 1 unit = 1 world unit on the ground plane
// This controls the initial generation parameter settings

// Site
pub const BASE_DIM: f32 = 200.0;          // side length of the square site
pub const INITIAL_SEED: u64 = 1512086461918454205;

// Ring roads
pub const NUM_RINGS: usize = 4;
pub const RING_POINTS: usize = 32;        // outline / annulus resolution
pub const RING_WIDTH: f32 = 4.0;

// Radial divisions (spokes)
pub const NUM_DIVISIONS: usize = 12;
pub const DIVISION_WIDTH: f32 = RING_WIDTH;

// River
pub const RIVER_POINTS: usize = 32;       // curve subdivisions

// Cell lattice
pub const CELL_DIM: f32 = 7.0;
pub const BORDER_MARGIN: f32 = 5.0;       // no cells this close to the site edge
pub const DIVISION_TOLERANCE: f32 = 1.0;  // triangle-inequality slack around spokes

// Building parameters (shape grammar)
pub const LOT_INSET: f32 = 1.5;           // lot is cell_dim minus this
pub const MIN_PLOT_AREA: f32 = 6.0;
pub const SPLIT_CHAOS: f32 = 0.3;
pub const EMPTY_PROB: f32 = 0.1;
pub const MAX_SPLIT_DEPTH: usize = 3;
pub const MIN_BUILDING_HEIGHT: f32 = 2.0;
pub const MAX_BUILDING_HEIGHT: f32 = 24.0;
pub const HEIGHT_JITTER: f32 = 0.15;      // std-dev of height noise, fraction of height
pub const TIER_SETBACK: f32 = 0.6;        // upper tiers shrink by this much per side

// Colors (srgb), base ground and streets
pub const BASE_COLOR: [f32; 3] = [0.08, 0.36, 0.22];
pub const STREET_COLOR: [f32; 3] = [0.01, 0.10, 0.14];
pub const RIVER_COLOR: [f32; 3] = [0.20, 0.45, 0.85];
pub const LIGHT_BUILDING_COLOR: [f32; 3] = [0.85, 0.84, 0.80];
pub const DARK_BUILDING_COLOR: [f32; 3] = [0.45, 0.47, 0.55];

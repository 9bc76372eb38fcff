// shape grammar for the buildings standing on accepted cells
// usage follows "set state, then generate": one grammar, many cells

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::systems::layout::{Cell, CellColor};
use crate::systems::mesh::poly::subdivision::{split_lot, SplitRules};
use crate::systems::mesh::poly::utils::{inset_polygon, polygon_area, square_lot};
use crate::systems::mesh::{BuildingParams, Polygon};

/// One extruded block of a building.
#[derive(Debug, Clone)]
pub struct BuildingPart {
    pub footprint: Polygon,
    pub base: f32,
    pub height: f32,
    pub color: CellColor,
}

pub struct ShapeGrammar {
    rules: BuildingParams,
    cell_dim: f32,
    state: Option<Cell>,
}

impl ShapeGrammar {
    pub fn new(rules: BuildingParams, cell_dim: f32) -> Self {
        Self { rules, cell_dim, state: None }
    }

    pub fn set_state(&mut self, cell: &Cell) {
        self.state = Some(cell.clone());
    }

    /// Lot -> plots -> tiers.
    /// The lot is a square on the cell position, split into plots; every plot
    /// becomes a stack of setback tiers whose total height follows the cell density.
    pub fn generate(&self, rng: &mut StdRng) -> Vec<BuildingPart> {
        let Some(cell) = &self.state else {
            return Vec::new();
        };

        let side = self.cell_dim - self.rules.lot_inset;
        if side <= 0.0 {
            return Vec::new();
        }

        let lot = square_lot(cell.position.truncate(), side);
        let split_rules = SplitRules {
            min_area: self.rules.min_plot_area,
            chaos: self.rules.split_chaos,
            empty_prob: self.rules.empty_prob,
            max_depth: self.rules.max_split_depth,
        };
        let plots = split_lot(&lot, &split_rules, 0, rng);

        let target = self.target_height(cell.density);
        let jitter = Normal::new(1.0, self.rules.height_jitter).ok();
        let tiers = tier_count(cell.density);

        let mut parts = Vec::new();
        for plot in plots {
            // small gap between neighbouring plots
            let Some(footprint) = inset_polygon(&plot, 0.15) else {
                continue;
            };

            let factor = jitter.map_or(1.0, |normal| normal.sample(rng));
            let height = (target * factor).clamp(self.rules.min_height, self.rules.max_height);
            parts.extend(self.stack_tiers(footprint, height, tiers, cell.color));
        }

        parts
    }

    fn target_height(&self, density: f32) -> f32 {
        // denser towards the center, squared so the core stands out
        let t = density.clamp(0.0, 1.0).powi(2);
        self.rules.min_height + (self.rules.max_height - self.rules.min_height) * t
    }

    fn stack_tiers(&self, footprint: Polygon, height: f32, tiers: usize, color: CellColor) -> Vec<BuildingPart> {
        let mut parts = Vec::with_capacity(tiers);
        let mut current = footprint;
        let mut base = 0.0;
        // lower tiers carry most of the mass
        let mut remaining = height;

        for tier in 0..tiers {
            let last = tier + 1 == tiers;
            let tier_height = if last { remaining } else { remaining * 0.6 };

            parts.push(BuildingPart {
                footprint: current.clone(),
                base,
                height: tier_height,
                color,
            });

            base += tier_height;
            remaining -= tier_height;

            match inset_polygon(&current, self.rules.tier_setback) {
                Some(next) if polygon_area(&next) > 1.0 => current = next,
                _ => break,
            }
        }

        parts
    }
}

fn tier_count(density: f32) -> usize {
    if density > 0.66 {
        3
    } else if density > 0.33 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn cell(density: f32) -> Cell {
        Cell {
            position: Vec3::new(14.0, -21.0, 0.0),
            density,
            color: CellColor::Dark,
        }
    }

    #[test]
    fn nothing_without_state() {
        let grammar = ShapeGrammar::new(BuildingParams::default(), 7.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(grammar.generate(&mut rng).is_empty());
    }

    #[test]
    fn parts_stay_within_the_lot_and_height_limits() {
        let rules = BuildingParams { empty_prob: 0.0, ..default() };
        let mut grammar = ShapeGrammar::new(rules, 7.0);
        grammar.set_state(&cell(0.8));
        let mut rng = StdRng::seed_from_u64(2);
        let parts = grammar.generate(&mut rng);
        assert!(!parts.is_empty());

        let half = (7.0 - rules.lot_inset) / 2.0;
        for part in &parts {
            assert_eq!(part.color, CellColor::Dark);
            assert!(part.height > 0.0);
            assert!(part.base + part.height <= rules.max_height + 1e-3);
            for v in &part.footprint {
                assert!((v.x - 14.0).abs() <= half + 1e-3);
                assert!((v.y + 21.0).abs() <= half + 1e-3);
            }
        }
    }

    #[test]
    fn dense_cells_build_taller() {
        let rules = BuildingParams { empty_prob: 0.0, height_jitter: 0.0, ..default() };
        let tallest = |density: f32| {
            let mut grammar = ShapeGrammar::new(rules, 7.0);
            grammar.set_state(&cell(density));
            let mut rng = StdRng::seed_from_u64(3);
            grammar
                .generate(&mut rng)
                .iter()
                .map(|p| p.base + p.height)
                .fold(0.0_f32, f32::max)
        };
        assert!(tallest(0.9) > tallest(0.2));
    }

    #[test]
    fn same_seed_same_building() {
        let mut grammar = ShapeGrammar::new(BuildingParams::default(), 7.0);
        grammar.set_state(&cell(0.5));
        let a = grammar.generate(&mut StdRng::seed_from_u64(10));
        let b = grammar.generate(&mut StdRng::seed_from_u64(10));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.footprint, y.footprint);
            assert_eq!(x.height, y.height);
        }
    }
}

// polygon geometry and mesh building for the city renderer

pub mod subdivision;
pub mod mesh_gen;
pub mod utils;

pub mod grid;
pub mod layout;
pub mod mesh;
pub mod ui;

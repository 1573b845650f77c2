// Catalog module: category filtering and the render model built from it.

pub mod filter;
pub mod render;

pub use filter::{category_chips, CategoryFilter, Chip};
pub use render::{count_label, render, RenderModel, RenderState};

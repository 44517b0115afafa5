//! Ray-primitive intersection routines.
//!
//! Triangle tests refine a [`Hit`](crate::Hit) in place; box tests return
//! the parameter interval used to prune BVH nodes and whole meshes.

mod aabb;
mod triangle;

pub use aabb::{intersect_box, BoxHit};
pub use triangle::intersect_triangle;

//! Core types and utilities

pub mod vec3;

pub use vec3::{radial_distance_sq, Vec3};

mod artifact;

pub use artifact::{Coordinate, Library};

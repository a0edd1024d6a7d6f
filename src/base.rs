pub mod board;
pub mod vec2d;

pub use vec2d::Vec2D;

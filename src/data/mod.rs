pub mod loader;
pub mod normalize;
pub mod split;
pub mod window;

pub mod apply;
pub mod canvas;
pub mod instruction;
pub mod normalize;

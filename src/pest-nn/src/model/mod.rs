pub mod blocks;
pub mod convnext;
pub mod inference;
pub mod weights;

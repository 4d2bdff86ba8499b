pub mod analysis;
pub mod binning;
pub mod decode;
pub mod frames;
pub mod matrix;
pub mod spectrum;

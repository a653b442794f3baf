pub mod cache;
pub mod grid;
pub mod mapping;
pub mod raster;
pub mod table;

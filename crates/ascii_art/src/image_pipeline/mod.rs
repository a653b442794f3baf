pub mod brightness;
pub mod partition;
pub mod resolution;
pub mod source;

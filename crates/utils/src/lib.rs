pub mod assets;
pub mod casing;
pub mod response;

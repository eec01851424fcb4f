pub mod real;
pub mod format;
pub mod vector;

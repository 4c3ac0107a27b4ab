pub mod attempts;
pub mod locks;
pub mod problems;

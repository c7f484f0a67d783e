pub mod predict;
pub mod teams;

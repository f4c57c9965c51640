pub mod gui;
pub mod model;

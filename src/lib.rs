pub mod capture;
pub mod config;
pub mod my_types;
pub mod pinhole;
pub mod selection;
pub mod session;
pub mod tracker;
pub mod visualization;

//! Rebar cutting-stock combination engine: assembles target cut lengths
//! from a finite inventory of stock bars, one diameter at a time.

pub mod render;
pub mod search;
pub mod solver;
pub mod types;


pub mod mld;
pub mod stokes;

pub mod batch;
pub mod diag;
pub mod preprocess;

pub mod case;
pub mod dat;
pub mod grid;
pub mod map;

pub mod constants;
pub mod error;
pub mod parameters;

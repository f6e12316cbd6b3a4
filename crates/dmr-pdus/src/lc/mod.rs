pub mod full_lc;

pub use full_lc::FullLc;

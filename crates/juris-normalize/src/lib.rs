pub mod error;
pub mod lists;
pub mod normalizer;

pub use error::{NormalizeError, Result};
pub use lists::{join_list, parse_list};
pub use normalizer::normalize;

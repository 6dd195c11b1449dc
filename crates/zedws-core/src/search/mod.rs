mod engine;
mod result;
mod scoring;

pub use engine::{SearchEngine, rank};
pub use result::MatchResult;
pub use scoring::{
    EXACT_LEAF_SCORE, LEAF_BASE, LEAF_WEIGHT, PATH_WEIGHT, PREFIX_BONUS, fuzzy_score,
};

//! Natural-language skill extraction: prompt construction, lenient parsing of model
//! output and per-candidate normalization.

pub mod parser;
pub mod prompt;
pub mod validator;

pub use parser::{parse_candidates, CandidateRecord};
pub use prompt::build_extraction_prompt;
pub use validator::validate_candidate;

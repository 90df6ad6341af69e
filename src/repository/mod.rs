pub mod candidates;
pub mod results;

pub use candidates::{parse_candidates, CandidateRepository};
pub use results::ResultRepository;

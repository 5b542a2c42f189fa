// Core algorithm exports
pub mod extractor;
pub mod matcher;
pub mod normalize;
pub mod presenter;

pub use extractor::{EntityExtractor, ExtractionError, LabelAllowList};
pub use matcher::{merge_ranked, MatchError, MatchResult, Matcher, Ranking};
pub use normalize::{normalize, normalize_set, parse_skill_list};
pub use presenter::present;

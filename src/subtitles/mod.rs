//! Subtitle selection and matching.
//!
//! - [`gaps`] -- Which requested languages a video lacks.
//! - [`descriptor`] -- Provider-agnostic video descriptors.
//! - [`ranker`] -- Best candidate per language.
//! - [`matcher`] -- Equivalent track on another video.
//! - [`format`] -- Format allow-list and priority.
//! - [`hash`] -- Content hashes providers match on.

pub mod descriptor;
pub mod format;
pub mod gaps;
pub mod hash;
pub mod matcher;
pub mod ranker;

pub use descriptor::{DescriptorBuilder, DescriptorKind, VideoDescriptor, HASH_THRESHOLD_BYTES};
pub use format::FormatPriority;
pub use gaps::{missing_languages, GapAnalyzer};
pub use matcher::{find_matches, similarity};
pub use ranker::{CandidateRanker, Selection};

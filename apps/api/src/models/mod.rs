pub mod analysis;
pub mod profile;
pub mod question;

pub use analysis::{AnalysisResult, GeneratedImages, ImageSlot, RelationshipAdvice};
pub use profile::{RelationshipStatus, UserContext};
pub use question::{Answer, Dimension, Question, QUESTION_COUNT};

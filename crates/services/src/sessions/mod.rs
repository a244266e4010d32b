mod flow;
mod plan;
mod score;
mod session;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use flow::{QuizFlow, QuizState};
pub use plan::{PlanSource, SessionPlan, shuffle_questions};
pub use score::Score;
pub use session::{QuizSession, SessionQuestion, Step};
pub use view::{ReviewItem, ReviewStatus, SessionProgress};

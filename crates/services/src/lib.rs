#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod topic_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{ImportError, SessionError};
pub use topic_service::{ImportOutcome, TopicService};

pub use sessions::{
    PlanSource, QuizFlow, QuizSession, QuizState, ReviewItem, ReviewStatus, Score,
    SessionPlan, SessionProgress, SessionQuestion, Step, shuffle_questions,
};

mod ids;
mod question;
mod response;
mod topic;

pub use ids::{ParseIdError, SessionQuestionId, TopicId};
pub use question::{
    MAX_LETTER_OPTIONS, MIN_OPTIONS, QuestionError, QuestionRecord, index_to_letter,
    letter_to_index,
};
pub use response::{OptionState, ResponseEntry, option_states};
pub use topic::{Topic, TopicError, TopicName};

use crate::answer_key::AnswerSet;

pub const UNMATCHED_FEEDBACK: &str = "Incorrect answer";

/// What to do with a selected tag that has no entry in the answer key.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UnmatchedPolicy {
    /// Record a synthetic incorrect entry with a generic message.
    #[default]
    MarkIncorrect,
    /// Leave the tag out of the feedback list.
    Omit,
}

#[derive(Clone, PartialEq, Debug)]
pub struct TagFeedback {
    pub tag: String,
    pub correct: bool,
    pub message: String,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Grade {
    pub feedback: Vec<TagFeedback>,
    all_correct: bool,
}

impl Grade {
    /// Every selected tag was found in the key and marked correct.
    pub fn celebrate(&self) -> bool {
        self.all_correct
    }
}

pub fn grade(selected: &[String], answers: &AnswerSet, policy: UnmatchedPolicy) -> Grade {
    let mut feedback = Vec::with_capacity(selected.len());
    let mut all_correct = !selected.is_empty();

    for tag in selected {
        match answers.answer_for(tag) {
            Some(entry) => {
                all_correct &= entry.correct;
                feedback.push(TagFeedback {
                    tag: tag.clone(),
                    correct: entry.correct,
                    message: entry.feedback.clone(),
                });
            }
            None => {
                all_correct = false;
                if policy == UnmatchedPolicy::MarkIncorrect {
                    feedback.push(TagFeedback {
                        tag: tag.clone(),
                        correct: false,
                        message: UNMATCHED_FEEDBACK.to_string(),
                    });
                }
            }
        }
    }

    Grade { feedback, all_correct }
}

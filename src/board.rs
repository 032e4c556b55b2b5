use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::answer_key::{shuffle_tags, AnswerSet};
use crate::error::SubmitError;
use crate::grading::{grade, Grade, UnmatchedPolicy};

/// The two sides of the board a tag can sit on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pool {
    Available,
    Selected,
}

/// Where a tag currently lives. `Selected` carries a stamp so the selected
/// pool keeps the order tags were picked in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Placement {
    Available,
    Selected(u64),
}

impl Placement {
    fn pool(self) -> Pool {
        match self {
            Placement::Available => Pool::Available,
            Placement::Selected(_) => Pool::Selected,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Loaded and untouched: nothing selected yet.
    Loaded,
    Answering,
    Submitted,
}

/// Tag pools for one widget. Every tag has exactly one placement, so the
/// available and selected pools always partition the full tag list.
#[derive(Clone, PartialEq, Debug)]
pub struct TagBoard {
    order: Vec<String>,
    placements: HashMap<String, Placement>,
    next_stamp: u64,
    submitted: bool,
}

impl TagBoard {
    pub fn new<R: Rng + ?Sized>(tags: &[String], rng: &mut R) -> Self {
        let mut seen = HashSet::new();
        let mut order: Vec<String> = tags
            .iter()
            .filter(|tag| seen.insert(tag.as_str()))
            .cloned()
            .collect();
        let placements = order
            .iter()
            .map(|tag| (tag.clone(), Placement::Available))
            .collect();
        shuffle_tags(&mut order, rng);
        Self {
            order,
            placements,
            next_stamp: 0,
            submitted: false,
        }
    }

    /// Available tags in display order.
    pub fn options(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|tag| self.placements.get(*tag) == Some(&Placement::Available))
            .cloned()
            .collect()
    }

    /// Selected tags in the order they were picked.
    pub fn selected(&self) -> Vec<String> {
        let mut picked: Vec<(u64, &String)> = self
            .placements
            .iter()
            .filter_map(|(tag, placement)| match placement {
                Placement::Selected(stamp) => Some((*stamp, tag)),
                Placement::Available => None,
            })
            .collect();
        picked.sort_unstable_by_key(|(stamp, _)| *stamp);
        picked.into_iter().map(|(_, tag)| tag.clone()).collect()
    }

    pub fn pool_of(&self, tag: &str) -> Option<Pool> {
        self.placements.get(tag).map(|placement| placement.pool())
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn phase(&self) -> Phase {
        if self.submitted {
            Phase::Submitted
        } else if self.has_selection() {
            Phase::Answering
        } else {
            Phase::Loaded
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && self.has_selection()
    }

    fn has_selection(&self) -> bool {
        self.placements
            .values()
            .any(|placement| matches!(placement, Placement::Selected(_)))
    }

    /// Move `tag` into `target`. Returns whether anything changed; locked
    /// boards, unknown tags and moves into the current pool are ignored.
    pub fn move_tag(&mut self, tag: &str, target: Pool) -> bool {
        if self.submitted {
            return false;
        }
        let Some(placement) = self.placements.get_mut(tag) else {
            return false;
        };
        if placement.pool() == target {
            return false;
        }
        *placement = match target {
            Pool::Available => Placement::Available,
            Pool::Selected => {
                let stamp = self.next_stamp;
                self.next_stamp += 1;
                Placement::Selected(stamp)
            }
        };
        true
    }

    /// Click or Enter on a chip: flip it to the other pool.
    pub fn toggle(&mut self, tag: &str) -> bool {
        match self.pool_of(tag) {
            Some(Pool::Available) => self.move_tag(tag, Pool::Selected),
            Some(Pool::Selected) => self.move_tag(tag, Pool::Available),
            None => false,
        }
    }

    /// A chip dropped on one of the two pool containers.
    pub fn drop_tag(&mut self, tag: &str, destination: Pool) -> bool {
        self.move_tag(tag, destination)
    }

    pub fn submit(
        &mut self,
        answers: &AnswerSet,
        policy: UnmatchedPolicy,
    ) -> Result<Grade, SubmitError> {
        if self.submitted {
            return Err(SubmitError::AlreadySubmitted);
        }
        let selected = self.selected();
        if selected.is_empty() {
            return Err(SubmitError::NothingSelected);
        }
        self.submitted = true;
        Ok(grade(&selected, answers, policy))
    }

    /// Unlock the board, put every tag back in the available pool and
    /// reshuffle the display order.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.submitted = false;
        self.next_stamp = 0;
        for placement in self.placements.values_mut() {
            *placement = Placement::Available;
        }
        shuffle_tags(&mut self.order, rng);
    }
}

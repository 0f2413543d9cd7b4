use chrono::DateTime;
use chrono::Utc;
use ratatui_comments::CommentSectionAction;
use ratatui_comments::composer::Submission;
use ratatui_comments::model::CommentId;
use ratatui_comments::model::CommentNode;
use ratatui_comments::tree;

/// The host side of the thread: owns the forest and applies section actions to it.
pub struct Store {
    forest: Vec<CommentNode>,
    last_id: i64,
}

impl Store {
    pub fn new(forest: Vec<CommentNode>) -> Self {
        Self { forest, last_id: 0 }
    }

    pub fn forest(&self) -> &[CommentNode] {
        &self.forest
    }

    /// Applies `action` at time `now`. Returns whether the forest changed.
    pub fn apply(&mut self, action: &CommentSectionAction, now: DateTime<Utc>) -> bool {
        match action {
            CommentSectionAction::AddComment { submission, parent } => {
                self.add(submission, parent.as_ref(), now);
                true
            }
            CommentSectionAction::Like(id) => {
                self.forest = tree::increment_like(&self.forest, id);
                log::info!("liked comment {id}");
                true
            }
            CommentSectionAction::Delete(id) => {
                let before = tree::total_count(&self.forest);
                self.forest = tree::remove_node(&self.forest, id);
                log::info!(
                    "deleted comment {id} ({} comments removed)",
                    before - tree::total_count(&self.forest)
                );
                true
            }
            CommentSectionAction::None | CommentSectionAction::Redraw => false,
        }
    }

    fn add(&mut self, submission: &Submission, parent: Option<&CommentId>, now: DateTime<Utc>) {
        let id = self.next_id(now);
        let node = CommentNode::new(
            id,
            submission.author.clone(),
            submission.message.clone(),
            now,
        );
        match parent {
            Some(parent) => {
                self.forest = tree::insert_reply(&self.forest, parent, node);
                log::info!("comment {id} by {} added under {parent}", submission.author);
            }
            None => {
                self.forest.push(node);
                log::info!("comment {id} by {} added at the root", submission.author);
            }
        }
    }

    // Millisecond timestamp, bumped past the last issued id and any id already in the forest.
    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let mut id = now.timestamp_millis().max(self.last_id + 1);
        while tree::contains(&self.forest, &CommentId::Int(id)) {
            id += 1;
        }
        self.last_id = id;
        id
    }
}

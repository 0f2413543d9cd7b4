use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_comments::input::InputEvent;
use ratatui_comments::input::KeyCode;
use ratatui_comments::input::KeyEvent;
use ratatui_comments::model::CommentId;
use ratatui_comments::model::CommentNode;
use ratatui_comments::render::buffer_row_text;
use ratatui_comments::section::CommentSection;
use ratatui_comments::section::CommentSectionAction;
use ratatui_comments::section::CommentSectionOptions;
use ratatui_comments::theme::Theme;
use ratatui_comments::tree;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().unwrap()
}

/// Minimal host: owns the forest and applies whatever the section asks for.
struct Host {
    forest: Vec<CommentNode>,
    section: CommentSection,
    next_id: i64,
}

impl Host {
    fn new(forest: Vec<CommentNode>, options: CommentSectionOptions) -> Self {
        let mut section = CommentSection::with_options(options);
        section.set_now(Some(now()));
        Self {
            forest,
            section,
            next_id: 100,
        }
    }

    fn send(&mut self, event: impl Into<InputEvent>) -> CommentSectionAction {
        let action = self.section.handle_event(event.into(), &self.forest);
        match &action {
            CommentSectionAction::AddComment { submission, parent } => {
                let node = CommentNode::new(
                    self.next_id,
                    submission.author.clone(),
                    submission.message.clone(),
                    now(),
                );
                self.next_id += 1;
                self.forest = match parent {
                    Some(parent) => tree::insert_reply(&self.forest, parent, node),
                    None => {
                        let mut forest = self.forest.clone();
                        forest.push(node);
                        forest
                    }
                };
            }
            CommentSectionAction::Like(id) => {
                self.forest = tree::increment_like(&self.forest, id);
            }
            CommentSectionAction::Delete(id) => {
                self.forest = tree::remove_node(&self.forest, id);
            }
            CommentSectionAction::None | CommentSectionAction::Redraw => {}
        }
        action
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.send(KeyEvent::char(ch));
        }
    }

    fn screen(&mut self, w: u16, h: u16) -> Vec<String> {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        self.section.render(area, &mut buf, &Theme::default(), &self.forest);
        (0..h).map(|y| buffer_row_text(&buf, y)).collect()
    }
}

fn seed() -> Vec<CommentNode> {
    vec![
        CommentNode::new(1, "Sarah Johnson", "This looks great!", now())
            .with_likes(5)
            .with_replies(vec![
                CommentNode::new(2, "Mike Chen", "Spam spam spam", now()).blocked(),
            ]),
        CommentNode::new(3, "Alex Rivera", "Thanks for sharing.", now()).with_likes(1),
    ]
}

#[test]
fn post_reply_like_and_delete_round_trip() {
    let mut host = Host::new(
        seed(),
        CommentSectionOptions {
            admin: true,
            ..CommentSectionOptions::default()
        },
    );
    let screen = host.screen(70, 30);
    assert_eq!(screen[0].trim_end(), "Comments (3)");

    // New root comment through the top composer.
    host.send(KeyEvent::char('c'));
    host.type_text("Hello thread");
    let action = host.send(KeyCode::Enter);
    assert!(matches!(action, CommentSectionAction::AddComment { parent: None, .. }));
    host.send(KeyCode::Esc);
    assert_eq!(tree::total_count(&host.forest), 4);
    let screen = host.screen(70, 30);
    assert_eq!(screen[0].trim_end(), "Comments (4)");
    assert!(screen.iter().any(|r| r.contains("Hello thread")));
    assert!(screen.iter().any(|r| r.contains("Anonymous")));

    // Like the first comment twice: only one like lands.
    assert_eq!(host.send(KeyEvent::char('g')), CommentSectionAction::Redraw);
    host.send(KeyEvent::char('l'));
    host.send(KeyEvent::char('l'));
    assert_eq!(tree::find(&host.forest, &1.into()).map(|n| n.likes), Some(6));
    assert!(host.screen(70, 30).iter().any(|r| r.contains("♥ 6")));

    // Reply to it.
    host.send(KeyEvent::char('r'));
    host.type_text("  me too  ");
    host.send(KeyCode::Enter);
    let parent = tree::find(&host.forest, &1.into()).unwrap();
    assert_eq!(parent.replies.last().map(|r| r.content.as_str()), Some("me too"));

    // Block it after confirming.
    host.send(KeyEvent::char('x'));
    assert_eq!(
        host.send(KeyEvent::char('y')),
        CommentSectionAction::Delete(CommentId::from(1))
    );
    assert!(!tree::contains(&host.forest, &1.into()));
    assert!(!tree::contains(&host.forest, &2.into()));
    assert_eq!(tree::total_count(&host.forest), 2);
    host.screen(70, 30);
    assert_eq!(host.section.cursor(), Some(&CommentId::from(3)));
}

#[test]
fn blocked_comment_never_leaks_its_text() {
    let mut host = Host::new(seed(), CommentSectionOptions::default());
    let screen = host.screen(80, 24).join("\n");
    assert!(screen.contains("This comment is unavailable or deleted."));
    assert!(!screen.contains("Mike Chen"));
    assert!(!screen.contains("Spam"));
}

#[test]
fn replies_of_blocked_comments_still_render() {
    let forest = vec![
        CommentNode::new(1, "X", "Y", now())
            .blocked()
            .with_replies(vec![CommentNode::new(2, "Visible Child", "still here", now())]),
    ];
    let mut host = Host::new(forest, CommentSectionOptions::default());
    let screen = host.screen(60, 16).join("\n");
    assert!(screen.contains("Visible Child"));
    assert!(screen.contains("still here"));
}

#[test]
fn typed_shortcuts_go_to_the_composer_while_editing() {
    let mut host = Host::new(seed(), CommentSectionOptions::default());
    host.send(KeyEvent::char('c'));
    assert!(host.section.is_editing());
    host.type_text("xl");
    assert_eq!(host.section.composer().message(), "xl");
    assert_eq!(tree::find(&host.forest, &1.into()).map(|n| n.likes), Some(5));
}

use std::fs;
use std::path::Path;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use ratatui_comments::model;
use ratatui_comments::model::CommentNode;
use ratatui_comments::tree;

use crate::error::DemoError;

/// Three comments with image avatars, one nested reply of which is blocked.
pub fn sample_forest(now: DateTime<Utc>) -> Vec<CommentNode> {
    vec![
        CommentNode::new(
            1,
            "Sarah Johnson",
            "This is a great component! Really love the nested reply feature.",
            now - Duration::hours(1),
        )
        .with_avatar("https://placehold.co/40x40/3b82f6/fff?text=SJ")
        .with_likes(5)
        .with_replies(vec![
            CommentNode::new(
                2,
                "Mike Chen",
                "I agree! The design is clean and intuitive.",
                now - Duration::minutes(30),
            )
            .with_avatar("https://placehold.co/40x40/10b981/fff?text=MC")
            .with_likes(2)
            .blocked(),
        ]),
        CommentNode::new(
            3,
            "Alex Rivera",
            "Can this be customized with different themes?",
            now - Duration::hours(2),
        )
        .with_avatar("https://placehold.co/40x40/f59e0b/fff?text=AR")
        .with_likes(1),
    ]
}

/// Reads a forest from a JSON file and rejects repeated ids.
pub fn load_seed(path: &Path) -> Result<Vec<CommentNode>, DemoError> {
    let json = fs::read_to_string(path)?;
    let forest = model::load_forest_json(&json)?;
    tree::check_unique_ids(&forest)?;
    log::info!(
        "loaded {} comments from {}",
        tree::total_count(&forest),
        path.display()
    );
    Ok(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_comments::avatar::Avatar;
    use ratatui_comments::format::AvatarColor;
    use ratatui_comments::model::CommentId;

    #[test]
    fn sample_has_blocked_nested_reply() {
        let forest = sample_forest(Utc::now());
        assert_eq!(tree::total_count(&forest), 3);
        let reply = tree::find(&forest, &CommentId::from(2)).unwrap();
        assert!(reply.blocked);
        assert_eq!(tree::depth_of(&forest, &CommentId::from(2)), Some(1));
        assert!(tree::check_unique_ids(&forest).is_ok());
    }

    #[test]
    fn sample_comments_carry_image_avatars() {
        let forest = sample_forest(Utc::now());
        for id in [1, 2, 3] {
            let node = tree::find(&forest, &CommentId::from(id)).unwrap();
            let avatar = Avatar::for_node(node, AvatarColor::new(0, 0, 0));
            assert!(
                matches!(&avatar, Avatar::Image { src, .. } if src.starts_with("https://placehold.co/")),
                "{id}: {avatar:?}"
            );
        }
    }
}

mod dispatch;
pub mod render;

pub use dispatch::dispatch;

use crate::structs::DigestCandidate;

use store::structs::{Link, User};

/// Groups a snapshot of users and links into the digest candidates of one
/// (year, week). Users who opted out of email and users with nothing
/// saved that week produce no candidate. Pure, no side effects; link
/// order within a candidate follows the snapshot.
pub fn build_candidates(
    users: &[User],
    links: &[Link],
    year: i32,
    week: u32,
) -> Vec<DigestCandidate> {
    users
        .iter()
        .filter(|user| user.email_notifications)
        .filter_map(|user| {
            let picked: Vec<Link> = links
                .iter()
                .filter(|link| link.owner == user.id && link.year == year && link.week == week)
                .cloned()
                .collect();
            if picked.is_empty() {
                None
            } else {
                Some(DigestCandidate {
                    user: user.clone(),
                    year,
                    week,
                    links: picked,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use store::structs::TIER_FREE;
    use store::week::week_of;

    fn user(id: i64, email_notifications: bool) -> User {
        User {
            id,
            email: format!("user{id}@example.org"),
            first_name: String::new(),
            last_name: String::new(),
            tier: TIER_FREE.to_string(),
            email_verified: true,
            email_notifications,
            account_created: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn link(id: i64, owner: i64, day: u32) -> Link {
        let date_saved = Utc.with_ymd_and_hms(2023, 6, day, 12, 0, 0).unwrap();
        let (year, week) = week_of(date_saved.date_naive());
        Link {
            id,
            owner,
            url: format!("https://example.org/{id}"),
            title: format!("link {id}"),
            notes: String::new(),
            tags: String::new(),
            date_saved,
            year,
            week,
            archived: false,
            click_count: 0,
        }
    }

    // 2023-06-15 falls into week 24
    const YEAR: i32 = 2023;
    const WEEK: u32 = 24;

    #[test]
    fn test_groups_by_owner_and_week() {
        let users = vec![user(1, true), user(2, true)];
        let links = vec![
            link(1, 1, 12),
            link(2, 1, 15),
            link(3, 2, 15),
            // a different week, never bundled
            link(4, 1, 25),
        ];

        let candidates = build_candidates(&users, &links, YEAR, WEEK);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].user.id, 1);
        assert_eq!(candidates[0].link_ids(), vec![1, 2]);
        assert_eq!(candidates[1].user.id, 2);
        assert_eq!(candidates[1].link_ids(), vec![3]);
    }

    #[test]
    fn test_opted_out_user_yields_no_candidate() {
        let users = vec![user(1, false)];
        let links = vec![
            link(1, 1, 12),
            link(2, 1, 13),
            link(3, 1, 14),
            link(4, 1, 15),
            link(5, 1, 16),
        ];

        assert!(build_candidates(&users, &links, YEAR, WEEK).is_empty());
    }

    #[test]
    fn test_empty_week_yields_no_candidate() {
        let users = vec![user(1, true)];
        let links = vec![link(1, 1, 25)]; // week 26, not 24

        assert!(build_candidates(&users, &links, YEAR, WEEK).is_empty());
    }

    #[test]
    fn test_link_order_preserved() {
        let users = vec![user(1, true)];
        let links = vec![link(9, 1, 15), link(2, 1, 12), link(5, 1, 13)];

        let candidates = build_candidates(&users, &links, YEAR, WEEK);
        assert_eq!(candidates[0].link_ids(), vec![9, 2, 5]);
    }
}

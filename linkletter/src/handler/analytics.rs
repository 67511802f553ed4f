use chrono::{DateTime, Utc};
use store::structs::{Digest, Link, User};
use store::week::week_of;

/// A point-in-time summary of the whole system, computed from snapshots.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Analytics {
    pub total_users: usize,
    pub free_users: usize,
    pub paid_users: usize,
    pub verified_users: usize,
    pub total_links: usize,
    /// Links stamped with the week containing `now`.
    pub links_this_week: usize,
    pub total_clicks: i64,
    pub digests_sent: usize,
    pub digests_opened: usize,
}

pub fn collect(users: &[User], links: &[Link], digests: &[Digest], now: DateTime<Utc>) -> Analytics {
    let (year, week) = week_of(now.date_naive());

    Analytics {
        total_users: users.len(),
        free_users: users.iter().filter(|u| !u.is_paid()).count(),
        paid_users: users.iter().filter(|u| u.is_paid()).count(),
        verified_users: users.iter().filter(|u| u.email_verified).count(),
        total_links: links.len(),
        links_this_week: links
            .iter()
            .filter(|l| l.year == year && l.week == week)
            .count(),
        total_clicks: links.iter().map(|l| l.click_count).sum(),
        digests_sent: digests.iter().filter(|d| d.email_sent).count(),
        digests_opened: digests.iter().filter(|d| d.email_opened).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use store::structs::{TIER_FREE, TIER_PAID};

    fn user(id: i64, tier: &str, verified: bool) -> User {
        User {
            id,
            email: format!("user{id}@example.org"),
            first_name: String::new(),
            last_name: String::new(),
            tier: tier.to_string(),
            email_verified: verified,
            email_notifications: true,
            account_created: Utc::now(),
        }
    }

    fn link(id: i64, year: i32, week: u32, clicks: i64) -> Link {
        Link {
            id,
            owner: 1,
            url: format!("https://example.org/{id}"),
            title: format!("link {id}"),
            notes: String::new(),
            tags: String::new(),
            date_saved: Utc::now(),
            year,
            week,
            archived: false,
            click_count: clicks,
        }
    }

    fn digest(id: i64, sent: bool, opened: bool) -> Digest {
        Digest {
            id,
            user: 1,
            year: 2023,
            week: 24,
            link_ids: vec![],
            email_sent: sent,
            send_failed: false,
            email_opened: opened,
            send_date: None,
        }
    }

    #[test]
    fn test_collect_counts() {
        // 2023-06-15 falls in week 24
        let now = Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap();

        let users = vec![
            user(1, TIER_FREE, true),
            user(2, TIER_PAID, false),
            user(3, TIER_FREE, false),
        ];
        let links = vec![
            link(1, 2023, 24, 3),
            link(2, 2023, 24, 0),
            link(3, 2023, 10, 7),
        ];
        let digests = vec![digest(1, true, true), digest(2, true, false), digest(3, false, false)];

        let stats = collect(&users, &links, &digests, now);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.free_users, 2);
        assert_eq!(stats.paid_users, 1);
        assert_eq!(stats.verified_users, 1);
        assert_eq!(stats.total_links, 3);
        assert_eq!(stats.links_this_week, 2);
        assert_eq!(stats.total_clicks, 10);
        assert_eq!(stats.digests_sent, 2);
        assert_eq!(stats.digests_opened, 1);
    }

    #[test]
    fn test_collect_empty() {
        let stats = collect(&[], &[], &[], Utc::now());
        assert_eq!(stats, Analytics::default());
    }
}

use store::structs::{Link, User};

/// A computed, not-yet-persisted grouping of one user's links for a
/// target week. Built fresh for every digest run and discarded after
/// dispatch; only the [`store::structs::Digest`] record survives.
#[derive(Debug, Clone)]
pub struct DigestCandidate {
    pub user: User,
    pub year: i32,
    pub week: u32,
    /// The owner's links of that week, original order preserved
    pub links: Vec<Link>,
}

impl DigestCandidate {
    pub fn link_ids(&self) -> Vec<i64> {
        self.links.iter().map(|l| l.id).collect()
    }
}

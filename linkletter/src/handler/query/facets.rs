use crate::structs::TagFacet;
use store::structs::Link;

/// Facet lists are capped for the filter UI
const MAX_FACETS: usize = 10;

/// Tag facets over a filtered (pre-pagination) result set: every unique
/// comma-split trimmed tag in first-seen order, counted by substring
/// occurrence across the set, top 10 by count with stable ties.
pub fn tag_facets(links: &[&Link]) -> Vec<TagFacet> {
    let mut facets: Vec<TagFacet> = Vec::new();
    for link in links {
        for tag in link.tag_list() {
            if !facets.iter().any(|f| f.tag == tag) {
                facets.push(TagFacet {
                    tag: tag.to_string(),
                    count: 0,
                });
            }
        }
    }

    for facet in &mut facets {
        facet.count = links.iter().filter(|l| l.tags.contains(&facet.tag)).count();
    }

    // sort_by is stable, so equal counts keep first-seen order
    facets.sort_by(|a, b| b.count.cmp(&a.count));
    facets.truncate(MAX_FACETS);
    facets
}

//! Tag helpers for navigation and filtering

use std::collections::HashSet;

use super::ArticleMetadata;

/// Unique tags in first-seen order
///
/// Untagged articles contribute nothing.
pub fn unique_tags(articles: &[ArticleMetadata]) -> Vec<String> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter_map(|article| article.tag.as_deref())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

/// Articles whose tag equals `tag`, in input order
///
/// A missing or empty tag means "no filter" and returns every article.
pub fn filter_by_tag(articles: &[ArticleMetadata], tag: Option<&str>) -> Vec<ArticleMetadata> {
    match tag.filter(|t| !t.is_empty()) {
        Some(tag) => articles
            .iter()
            .filter(|article| article.tag.as_deref() == Some(tag))
            .cloned()
            .collect(),
        None => articles.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::frontmatter::parse_date_string;

    fn article(id: &str, date: &str, tag: Option<&str>) -> ArticleMetadata {
        ArticleMetadata {
            id: id.to_string(),
            title: id.to_uppercase(),
            date: parse_date_string(date).unwrap(),
            description: String::new(),
            tag: tag.map(str::to_string),
        }
    }

    fn sample() -> Vec<ArticleMetadata> {
        vec![
            article("b", "2023-06-01", Some("rust")),
            article("c", "2023-06-01", None),
            article("a", "2023-01-01", Some("go")),
            article("d", "2022-12-01", Some("rust")),
        ]
    }

    #[test]
    fn test_unique_tags_first_seen_order() {
        assert_eq!(unique_tags(&sample()), vec!["rust", "go"]);
    }

    #[test]
    fn test_unique_tags_empty() {
        assert!(unique_tags(&[]).is_empty());
        assert!(unique_tags(&[article("c", "2023-06-01", None)]).is_empty());
    }

    #[test]
    fn test_filter_by_tag() {
        let articles = sample();
        let ids: Vec<_> = filter_by_tag(&articles, Some("rust"))
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["b", "d"]);
        assert!(filter_by_tag(&articles, Some("python")).is_empty());
    }

    #[test]
    fn test_filter_without_tag_is_identity() {
        let articles = sample();
        assert_eq!(filter_by_tag(&articles, None), articles);
        assert_eq!(filter_by_tag(&articles, Some("")), articles);
    }
}

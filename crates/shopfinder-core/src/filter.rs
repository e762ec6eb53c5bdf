//! Client-side search, category filtering, and ordering of shop lists.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::shops::Shop;

/// Search term plus optional category chip.
///
/// Both predicates must hold for a shop to match. Filtering never reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopFilter {
    pub search_term: String,
    pub category: Option<String>,
}

impl ShopFilter {
    #[must_use]
    pub fn new(search_term: impl Into<String>, category: Option<String>) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    /// Case-insensitive substring match on name, description, or city.
    #[must_use]
    pub fn matches_search(&self, shop: &Shop) -> bool {
        let needle = self.search_term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(shop.name.as_str()),
            shop.description.as_deref(),
            shop.city.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    #[must_use]
    pub fn matches_category(&self, shop: &Shop) -> bool {
        match &self.category {
            None => true,
            Some(wanted) => shop.categories.iter().any(|c| c == wanted),
        }
    }

    #[must_use]
    pub fn matches(&self, shop: &Shop) -> bool {
        self.matches_search(shop) && self.matches_category(shop)
    }

    /// Matching shops in their original order.
    #[must_use]
    pub fn apply<'a>(&self, shops: &'a [Shop]) -> Vec<&'a Shop> {
        shops.iter().filter(|s| self.matches(s)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep the order the API returned.
    #[default]
    AsReturned,
    /// Closest first; shops with unknown distance go last.
    Nearest,
    /// Case-insensitive by name.
    Name,
    /// Most recently created first; shops without a creation time go last.
    Newest,
}

impl SortOrder {
    /// Stable sort, so ties keep their original relative order.
    pub fn sort(self, shops: &mut [&Shop]) {
        match self {
            SortOrder::AsReturned => {}
            SortOrder::Nearest => shops.sort_by(|a, b| compare_distance(a, b)),
            SortOrder::Name => {
                shops.sort_by_cached_key(|s| s.name.to_lowercase());
            }
            SortOrder::Newest => shops.sort_by(|a, b| compare_created(a, b)),
        }
    }
}

fn compare_distance(a: &Shop, b: &Shop) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_created(a: &Shop, b: &Shop) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "as-returned" | "none" => Ok(SortOrder::AsReturned),
            "nearest" | "distance" => Ok(SortOrder::Nearest),
            "name" => Ok(SortOrder::Name),
            "newest" | "recent" => Ok(SortOrder::Newest),
            other => Err(format!(
                "unknown sort order \"{other}\" (expected as-returned, nearest, name, or newest)"
            )),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::AsReturned => write!(f, "as-returned"),
            SortOrder::Nearest => write!(f, "nearest"),
            SortOrder::Name => write!(f, "name"),
            SortOrder::Newest => write!(f, "newest"),
        }
    }
}

/// Badge text for a distance: meters under 1 km, one decimal of km above.
#[must_use]
pub fn format_distance(km: f64) -> String {
    let meters = (km * 1000.0).round();
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{km:.1} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakery_and_pizza() -> Vec<Shop> {
        vec![
            Shop::named("1", "Joe's Bakery")
                .with_city("Brooklyn")
                .with_categories(["bakery"]),
            Shop::named("2", "Mario's Pizza")
                .with_description("Wood-fired pies")
                .with_categories(["pizza", "italian"]),
        ]
    }

    fn names(shops: &[&Shop]) -> Vec<String> {
        shops.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let shops = bakery_and_pizza();
        let filter = ShopFilter::new("pizza", None);
        assert_eq!(names(&filter.apply(&shops)), vec!["Mario's Pizza"]);

        let upper = ShopFilter::new("PIZZA", None);
        assert_eq!(names(&upper.apply(&shops)), vec!["Mario's Pizza"]);
    }

    #[test]
    fn search_matches_description_and_city() {
        let shops = bakery_and_pizza();
        assert_eq!(
            names(&ShopFilter::new("wood-fired", None).apply(&shops)),
            vec!["Mario's Pizza"]
        );
        assert_eq!(
            names(&ShopFilter::new("brooklyn", None).apply(&shops)),
            vec!["Joe's Bakery"]
        );
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let shops = bakery_and_pizza();
        assert_eq!(
            names(&ShopFilter::default().apply(&shops)),
            vec!["Joe's Bakery", "Mario's Pizza"]
        );
    }

    #[test]
    fn search_term_is_matched_verbatim() {
        let shops = bakery_and_pizza();
        assert!(ShopFilter::new("joe ", None).apply(&shops).is_empty());
        assert!(ShopFilter::new("   ", None).apply(&shops).is_empty());
        assert_eq!(
            names(&ShopFilter::new("joe's", None).apply(&shops)),
            vec!["Joe's Bakery"]
        );
    }

    #[test]
    fn category_and_search_are_anded() {
        let shops = bakery_and_pizza();
        let filter = ShopFilter::new("joe", Some("pizza".into()));
        assert!(filter.apply(&shops).is_empty());

        let filter = ShopFilter::new("", Some("italian".into()));
        assert_eq!(names(&filter.apply(&shops)), vec!["Mario's Pizza"]);
    }

    #[test]
    fn nearest_puts_unknown_distances_last() {
        let mut far = Shop::named("1", "Far");
        far.distance_km = Some(12.0);
        let unknown = Shop::named("2", "Unknown");
        let mut near = Shop::named("3", "Near");
        near.distance_km = Some(0.4);

        let mut refs = vec![&far, &unknown, &near];
        SortOrder::Nearest.sort(&mut refs);
        assert_eq!(names(&refs), vec!["Near", "Far", "Unknown"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let a = Shop::named("1", "banana stand");
        let b = Shop::named("2", "Apple Cart");
        let mut refs = vec![&a, &b];
        SortOrder::Name.sort(&mut refs);
        assert_eq!(names(&refs), vec!["Apple Cart", "banana stand"]);
    }

    #[test]
    fn newest_puts_undated_shops_last() {
        let mut old = Shop::named("1", "Old");
        old.created_at = "2023-01-05T00:00:00Z".parse().ok();
        let undated = Shop::named("2", "Undated");
        let mut fresh = Shop::named("3", "Fresh");
        fresh.created_at = "2024-06-30T08:00:00Z".parse().ok();

        let mut refs = vec![&old, &undated, &fresh];
        SortOrder::Newest.sort(&mut refs);
        assert_eq!(names(&refs), vec!["Fresh", "Old", "Undated"]);
    }

    #[test]
    fn sort_order_parses_aliases() {
        assert_eq!("nearest".parse::<SortOrder>(), Ok(SortOrder::Nearest));
        assert_eq!("Distance".parse::<SortOrder>(), Ok(SortOrder::Nearest));
        assert_eq!("as-returned".parse::<SortOrder>(), Ok(SortOrder::AsReturned));
        assert_eq!("newest".parse::<SortOrder>(), Ok(SortOrder::Newest));
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn distance_badges() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.111), "111 m");
        assert_eq!(format_distance(0.9996), "1.0 km");
        assert_eq!(format_distance(12.34), "12.3 km");
    }
}

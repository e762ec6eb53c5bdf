use shopfinder_discovery::{DiscoveryMode, DiscoveryView, ShopCard};

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("expected valid cli args")
}

fn discover_args(cli: Cli) -> DiscoverArgs {
    match cli.command {
        Commands::Discover(args) => args,
        other => panic!("expected discover, got {other:?}"),
    }
}

#[test]
fn parses_discover_defaults() {
    let args = discover_args(parse(&["shopfinder", "discover"]));
    assert!(args.lat.is_none());
    assert!(!args.all);
    assert!(!args.deny_location);
    assert_eq!(args.search, "");
    assert_eq!(args.sort, SortOrder::AsReturned);
}

#[test]
fn parses_discover_with_negative_coordinates() {
    let args = discover_args(parse(&[
        "shopfinder",
        "discover",
        "--lat",
        "40.7",
        "--lng",
        "-73.9",
        "--sort",
        "nearest",
    ]));
    assert_eq!(args.lat, Some(40.7));
    assert_eq!(args.lng, Some(-73.9));
    assert_eq!(args.sort, SortOrder::Nearest);
}

#[test]
fn parses_newest_sort() {
    let args = discover_args(parse(&["shopfinder", "discover", "--sort", "newest"]));
    assert_eq!(args.sort, SortOrder::Newest);
}

#[test]
fn lat_requires_lng() {
    assert!(Cli::try_parse_from(["shopfinder", "discover", "--lat", "40.7"]).is_err());
}

#[test]
fn deny_location_conflicts_with_coordinates() {
    let result = Cli::try_parse_from([
        "shopfinder",
        "discover",
        "--deny-location",
        "--lat",
        "1",
        "--lng",
        "2",
    ]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["shopfinder", "discover", "--sort", "random"]).is_err());
}

#[test]
fn parses_distance_with_negative_values() {
    let cli = parse(&["shopfinder", "distance", "40", "-73", "-33.8", "151.2"]);
    assert!(matches!(
        cli.command,
        Commands::Distance { lat1, lng1, lat2, .. }
            if lat1 == 40.0 && lng1 == -73.0 && lat2 == -33.8
    ));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["shopfinder"]).is_err());
}

fn sample_view() -> DiscoveryView {
    DiscoveryView {
        mode: DiscoveryMode::Nearby,
        location_available: true,
        show_enable_location: false,
        notice: None,
        loading: false,
        error: None,
        show_retry: false,
        categories: vec!["bakery".into(), "pizza".into()],
        selected_category: Some("pizza".into()),
        search_term: String::new(),
        total_count: 2,
        shops: vec![ShopCard {
            id: "2".into(),
            name: "Mario's Pizza".into(),
            city: Some("Brooklyn".into()),
            address: Some("Brooklyn, NY".into()),
            categories: vec!["pizza".into()],
            distance_badge: Some("350 m".into()),
        }],
    }
}

#[test]
fn render_text_lists_shops_with_badges() {
    let text = discover::render_text(&sample_view());
    assert!(text.starts_with("Shops near you (1 of 2)"));
    assert!(text.contains("categories: bakery, [pizza]"));
    assert!(text.contains("- Mario's Pizza | Brooklyn, NY | 350 m"));
}

#[test]
fn render_text_for_denied_location() {
    let mut view = sample_view();
    view.location_available = false;
    view.show_enable_location = true;
    view.notice = Some("Location access denied.".into());
    view.shops[0].distance_badge = None;

    let text = discover::render_text(&view);
    assert!(text.starts_with("All shops"));
    assert!(text.contains("--enable-location"));
    assert!(!text.contains("350 m"));
}

#[test]
fn render_text_shows_error_and_retry_hint() {
    let mut view = sample_view();
    view.error = Some("Failed to load shops: boom".into());
    view.show_retry = true;
    view.shops.clear();

    let text = discover::render_text(&view);
    assert!(text.contains("error: Failed to load shops: boom"));
    assert!(text.contains("try again"));
}

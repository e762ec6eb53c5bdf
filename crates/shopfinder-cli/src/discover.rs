//! `shopfinder discover`: one pass of the discovery flow, rendered to stdout.

use std::fmt::Write as _;

use anyhow::Context;
use shopfinder_client::ShopsClient;
use shopfinder_core::{AppConfig, Coordinate};
use shopfinder_discovery::{
    DiscoveryController, DiscoveryMode, DiscoveryOptions, DiscoveryView, EnableOutcome,
    FixedLocation, HttpGeolocator, LocationError, LocationSource, NoLocation, PermissionState,
    PositionOptions,
};

use crate::DiscoverArgs;

/// Location source picked from flags and configuration.
pub(crate) enum CliLocation {
    Fixed(FixedLocation),
    Unavailable(NoLocation),
    Http(HttpGeolocator),
}

impl CliLocation {
    pub(crate) fn from_args(args: &DiscoverArgs, config: &AppConfig) -> anyhow::Result<Self> {
        if args.deny_location {
            return Ok(Self::Unavailable(NoLocation::Denied));
        }
        if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
            return Ok(Self::Fixed(FixedLocation(Coordinate::new(lat, lng))));
        }
        match &config.geolocate_url {
            Some(url) => {
                let geolocator = HttpGeolocator::new(url, &config.user_agent)
                    .context("building IP geolocator")?;
                Ok(Self::Http(geolocator))
            }
            None => Ok(Self::Unavailable(NoLocation::Unsupported)),
        }
    }
}

impl LocationSource for CliLocation {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        match self {
            CliLocation::Fixed(source) => source.current_position(options).await,
            CliLocation::Unavailable(source) => source.current_position(options).await,
            CliLocation::Http(source) => source.current_position(options).await,
        }
    }

    async fn query_permission(&self) -> Result<PermissionState, LocationError> {
        match self {
            CliLocation::Fixed(source) => source.query_permission().await,
            CliLocation::Unavailable(source) => source.query_permission().await,
            CliLocation::Http(source) => source.query_permission().await,
        }
    }
}

pub(crate) async fn run(config: &AppConfig, args: &DiscoverArgs) -> anyhow::Result<()> {
    let client = ShopsClient::from_config(config).context("building shops client")?;
    let location = CliLocation::from_args(args, config)?;

    let options = DiscoveryOptions {
        position: PositionOptions::with_timeout(config.geolocation_timeout()),
        movement_threshold_km: config.movement_threshold_km,
        initial_mode: if args.all {
            DiscoveryMode::All
        } else {
            DiscoveryMode::Nearby
        },
    };

    let mut controller = DiscoveryController::new(client, location, options);
    controller.set_search_term(args.search.clone());
    controller.set_category(args.category.clone());
    controller.set_sort(args.sort);

    controller.start().await;

    if args.enable_location && controller.location().is_denied() {
        match controller.enable_location_access().await {
            EnableOutcome::Enabled(coord) => tracing::info!(%coord, "location enabled"),
            EnableOutcome::Blocked => tracing::warn!("location permission is blocked"),
            EnableOutcome::StillUnavailable(err) => {
                tracing::warn!(error = %err, "location still unavailable");
            }
        }
    }

    let view = controller.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view));
    }

    if let Some(error) = &view.error {
        anyhow::bail!("{error}");
    }
    Ok(())
}

pub(crate) fn render_text(view: &DiscoveryView) -> String {
    let mut out = String::new();
    let heading = match view.mode {
        DiscoveryMode::Nearby if view.location_available => "Shops near you",
        _ => "All shops",
    };
    let _ = writeln!(
        out,
        "{heading} ({} of {})",
        view.shops.len(),
        view.total_count
    );

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    if view.show_enable_location {
        let _ = writeln!(out, "  (pass --enable-location to request location access again)");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
        let _ = writeln!(out, "  try again by re-running the command");
        return out;
    }
    if !view.categories.is_empty() {
        let chips: Vec<String> = view
            .categories
            .iter()
            .map(|c| {
                if view.selected_category.as_deref() == Some(c.as_str()) {
                    format!("[{c}]")
                } else {
                    c.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "categories: {}", chips.join(", "));
    }
    if view.shops.is_empty() {
        let _ = writeln!(out, "no shops match");
        return out;
    }

    for card in &view.shops {
        let mut line = card.name.clone();
        if let Some(address) = &card.address {
            let _ = write!(line, " | {address}");
        }
        if let Some(badge) = &card.distance_badge {
            let _ = write!(line, " | {badge}");
        }
        let _ = writeln!(out, "- {line}");
    }
    out
}

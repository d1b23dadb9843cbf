//! Command implementations. Output goes to stdout; diagnostics go through
//! `tracing`.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use drively_client::DrivelyClient;
use drively_core::conflict::resolve_conflicts;
use drively_core::membership::{tier_catalogue, TierInfo};
use drively_core::pricing::quote_dates;
use drively_core::requests::{dashboard_queue, group_by_car, StatusFilter};
use drively_core::review::review_eligibility;
use drively_core::search::CarQuery;
use drively_core::{MembershipTier, Money, Rating, Reservation};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::args::{Cli, Command, USAGE};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Help => {
            print!("{}", USAGE);
            Ok(())
        }
        Command::Quote {
            price,
            tier,
            from,
            to,
        } => quote(price, tier, from, to),
        Command::Conflicts { file, target } => conflicts(&file, &target),
        Command::ReviewCheck {
            file,
            ratings,
            reservation,
        } => review_check(&file, &ratings, &reservation),
        Command::Tiers { remote: false } => {
            print_tiers(&tier_catalogue());
            Ok(())
        }
        Command::Tiers { remote: true } => {
            let client = connect(cli.config)?;
            print_tiers(&client.membership_tiers().await?);
            Ok(())
        }
        Command::Cars { query } => cars(&connect(cli.config)?, &query).await,
        Command::Received { filter, dashboard } => {
            received(&connect(cli.config)?, filter, dashboard).await
        }
        Command::Accept { id } => accept(&connect(cli.config)?, &id).await,
        Command::Membership => membership(&connect(cli.config)?).await,
    }
}

fn connect(config: Option<PathBuf>) -> Result<DrivelyClient> {
    DrivelyClient::load(config).context("could not set up the Drively client")
}

/// Reads a JSON array, or the `data` array of a saved API response.
fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    if let Some(data) = value.get_mut("data") {
        value = data.take();
    }
    let items: Vec<T> = serde_json::from_value(value)
        .with_context(|| format!("unexpected shape in {}", path.display()))?;
    debug!(path = %path.display(), count = items.len(), "Loaded list");
    Ok(items)
}

fn find<'a>(reservations: &'a [Reservation], id: &str) -> Result<&'a Reservation> {
    reservations
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow!("reservation {} not found", id))
}

// =============================================================================
// Offline
// =============================================================================

fn quote(
    price: Money,
    tier: Option<MembershipTier>,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<()> {
    let q = quote_dates(price, tier, from, to)?;

    println!("Rental days:     {}", q.days);
    if q.has_discount() {
        println!(
            "Price per day:   {} (was {}, {})",
            q.effective_price_per_day, q.original_price_per_day, q.discount_label
        );
        println!("Total:           {} (was {})", q.total, q.original_total);
        println!("You save:        {}", q.savings());
    } else {
        println!("Price per day:   {}", q.effective_price_per_day);
        println!("Total:           {}", q.total);
    }
    Ok(())
}

fn conflicts(file: &Path, target_id: &str) -> Result<()> {
    let reservations: Vec<Reservation> = read_list(file)?;
    let target = find(&reservations, target_id)?;
    let resolution = resolve_conflicts(target, &reservations)?;

    if resolution.is_empty() {
        println!("No conflicting requests.");
    } else {
        println!("Accepting {} would remove:", target.id);
        for id in &resolution.conflicting_ids {
            if let Ok(other) = find(&reservations, id) {
                println!(
                    "  {}  {} to {}  ({})",
                    other.id,
                    other.pick_up_date,
                    other.return_date,
                    other.renter.display_name()
                );
            }
        }
    }
    println!("{}", resolution.message());
    Ok(())
}

fn review_check(file: &Path, ratings_file: &Path, reservation_id: &str) -> Result<()> {
    let reservations: Vec<Reservation> = read_list(file)?;
    let ratings: Vec<Rating> = read_list(ratings_file)?;
    let reservation = find(&reservations, reservation_id)?;

    let eligibility = review_eligibility(reservation, &ratings);
    println!("{}: {}", reservation.id, eligibility.label());
    Ok(())
}

fn print_tiers(tiers: &[TierInfo]) {
    for info in tiers {
        println!("{} ({})", info.name, info.price_label());
        println!("  {}", info.description);
        for feature in &info.features {
            println!("  • {}", feature);
        }
    }
}

// =============================================================================
// Backend
// =============================================================================

async fn cars(client: &DrivelyClient, query: &CarQuery) -> Result<()> {
    let cars = client.search_cars(query).await?;
    info!(count = cars.len(), sort = %query.sort, "Cars loaded");

    for car in &cars {
        println!(
            "{}  {} {} {}  {}/day  ★{:.1} ({})",
            car.id,
            car.year,
            car.make,
            car.model,
            car.rental_price,
            car.rating_score,
            car.review_count
        );
    }
    if cars.is_empty() {
        println!("No cars match.");
    }
    Ok(())
}

fn print_request(r: &Reservation) {
    println!(
        "  {}  {} to {}  {}  {}  {}",
        r.id,
        r.pick_up_date,
        r.return_date,
        r.status,
        r.total_price,
        r.renter.display_name()
    );
}

async fn received(client: &DrivelyClient, filter: StatusFilter, dashboard: bool) -> Result<()> {
    let all = client.received_reservations().await?;
    let shown: Vec<Reservation> = filter.apply(&all).into_iter().cloned().collect();

    if dashboard {
        println!("Next requests:");
        for r in dashboard_queue(&shown) {
            print_request(r);
        }
    } else {
        for group in group_by_car(&shown) {
            println!("Car {} ({} pending)", group.car_id(), group.pending_count());
            for r in &group.reservations {
                print_request(r);
            }
        }
    }
    if shown.is_empty() {
        println!("No requests.");
    }
    Ok(())
}

async fn accept(client: &DrivelyClient, id: &str) -> Result<()> {
    let received = client.received_reservations().await?;
    let target = find(&received, id)?;

    let outcome = client.accept_reservation(target, &received).await?;
    println!("{}", outcome.notice);
    Ok(())
}

async fn membership(client: &DrivelyClient) -> Result<()> {
    let status = client.membership_status().await?;
    let now = Utc::now();
    let membership = status.membership();
    let tier = membership.effective_tier(now);

    println!("Tier:      {}", tier.display_name());
    if let Some(countdown) = membership.countdown(now) {
        println!("Expires:   {}", countdown);
    }
    let benefits = status.membership_benefits.unwrap_or_else(|| tier.benefits());
    println!("Discount:  {}%", tier.discount_percent());
    println!("Delivery:  {}", if benefits.free_delivery { "free" } else { "standard" });
    println!(
        "Support:   {}",
        if benefits.priority_support { "priority" } else { "standard" }
    );
    if membership.can_renew(now) {
        println!("Your membership has expired and can be renewed.");
    }
    let upgrades = membership.upgrade_options(now);
    if !upgrades.is_empty() {
        let names: Vec<&str> = upgrades.iter().map(|t| t.display_name()).collect();
        println!("Upgrade to: {}", names.join(", "));
    }
    Ok(())
}

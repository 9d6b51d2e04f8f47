use fuel_core::polyline::encode;
use fuel_core::spatial::{distance, path_length};
use fuel_core::{plan_trip, GeoPoint, PlannerRules, RouteInput, StationCatalog, StationRecord, TripPlan};
use fuel_server::config::Config;
use fuel_server::state::AppState;
use std::sync::Arc;

#[derive(Clone)]
struct StressRoute {
    name: &'static str,
    from: GeoPoint,
    to: GeoPoint,
}

/// Waypoints per mile of straight-line corridor.
const SAMPLES_PER_MILE: f64 = 1.0;
/// Stations generated along each corridor.
const STATIONS_PER_ROUTE: usize = 120;
/// Concurrent planning rounds per route.
const ROUNDS: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let rules = config.planner.clone();
    rules.validate()?;

    let routes = vec![
        StressRoute {
            name: "New York -> Chicago",
            from: GeoPoint::new(40.7128, -74.0060),
            to: GeoPoint::new(41.8781, -87.6298),
        },
        StressRoute {
            name: "Chicago -> Denver",
            from: GeoPoint::new(41.8781, -87.6298),
            to: GeoPoint::new(39.7392, -104.9903),
        },
        StressRoute {
            name: "Dallas -> Los Angeles",
            from: GeoPoint::new(32.7767, -96.7970),
            to: GeoPoint::new(34.0522, -118.2437),
        },
        StressRoute {
            name: "Seattle -> Miami",
            from: GeoPoint::new(47.6062, -122.3321),
            to: GeoPoint::new(25.7617, -80.1918),
        },
        StressRoute {
            name: "Austin -> San Antonio",
            from: GeoPoint::new(30.2672, -97.7431),
            to: GeoPoint::new(29.4241, -98.4936),
        },
    ];

    let records: Vec<StationRecord> = routes
        .iter()
        .enumerate()
        .flat_map(|(route_index, route)| corridor_stations(route_index, route))
        .collect();
    let state = Arc::new(AppState::with_catalog(
        config,
        StationCatalog::from_records(records),
    ));
    println!("Catalog: {} stations", state.catalog().len());

    for route in routes {
        println!("\n=== {} ===", route.name);
        let waypoints = corridor(route.from, route.to);
        let input = RouteInput::new(encode(&waypoints)?, path_length(&waypoints));

        let mut handles = Vec::with_capacity(ROUNDS);
        for _ in 0..ROUNDS {
            let catalog = state.catalog();
            let input = input.clone();
            let rules = rules.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                plan_trip(&input, &catalog, &rules)
            }));
        }

        let mut plans = Vec::with_capacity(ROUNDS);
        for handle in handles {
            plans.push(handle.await?);
        }

        let first = match plans.first() {
            Some(Ok(plan)) => plan.clone(),
            Some(Err(err)) => {
                println!("Result: FAIL ({})", err);
                continue;
            }
            None => continue,
        };
        println!(
            "Result: OK | distance={:.0}mi stops={} cost=${:.2}",
            first.total_distance_miles,
            first.stops.len(),
            first.total_fuel_cost
        );

        let diverged = plans
            .iter()
            .filter(|plan| plan.as_ref().ok() != Some(&first))
            .count();
        if diverged == 0 {
            println!("Determinism check: PASS ({} rounds)", ROUNDS);
        } else {
            println!("Determinism check: FAIL ({} of {} rounds differ)", diverged, ROUNDS);
        }

        let violations = find_plan_violations(&first, &rules);
        if violations.is_empty() {
            println!("Plan check: PASS");
        } else {
            println!("Plan check: FAIL ({})", violations.len());
            for violation in violations {
                println!(" - {}", violation);
            }
        }
    }

    Ok(())
}

/// Straight corridor interpolated in latitude/longitude.
fn corridor(from: GeoPoint, to: GeoPoint) -> Vec<GeoPoint> {
    let samples = (distance(from, to) * SAMPLES_PER_MILE).ceil().max(1.0) as usize;
    (0..=samples)
        .map(|i| {
            let t = i as f64 / samples as f64;
            GeoPoint::new(
                from.latitude + t * (to.latitude - from.latitude),
                from.longitude + t * (to.longitude - from.longitude),
            )
        })
        .collect()
}

/// Stations spread along a corridor with deterministic offsets and prices.
fn corridor_stations(route_index: usize, route: &StressRoute) -> Vec<StationRecord> {
    (0..STATIONS_PER_ROUTE)
        .map(|i| {
            let t = (i as f64 + 0.5) / STATIONS_PER_ROUTE as f64;
            // Up to ~0.06 degrees off the line, some beyond the proximity threshold.
            let jitter = ((i * 37 + route_index * 11) % 13) as f64 * 0.005 - 0.03;
            let price = 2.75 + ((i * 7 + route_index * 3) % 19) as f64 * 0.05;
            StationRecord {
                id: format!("{}-{}", route_index, i),
                name: format!("{} #{}", route.name, i),
                latitude: Some(route.from.latitude + t * (route.to.latitude - route.from.latitude) + jitter),
                longitude: Some(route.from.longitude + t * (route.to.longitude - route.from.longitude)),
                price_per_gallon: Some(price),
                ..StationRecord::default()
            }
        })
        .collect()
}

fn find_plan_violations(plan: &TripPlan, rules: &PlannerRules) -> Vec<String> {
    let mut violations = Vec::new();
    for stop in &plan.stops {
        if stop.distance_from_route_miles > rules.proximity_threshold_miles {
            violations.push(format!(
                "{} is {:.1}mi from the route",
                stop.station.id, stop.distance_from_route_miles
            ));
        }
        if stop.segment_end_mile - stop.segment_start_mile > rules.max_range_miles {
            violations.push(format!(
                "{} selected for a {:.0}mi segment",
                stop.station.id,
                stop.segment_end_mile - stop.segment_start_mile
            ));
        }
    }
    for pair in plan.stops.windows(2) {
        let gap = distance(pair[0].station.location, pair[1].station.location);
        if gap < rules.min_stop_spacing_miles {
            violations.push(format!(
                "{} and {} only {:.0}mi apart",
                pair[0].station.id, pair[1].station.id, gap
            ));
        }
    }
    violations
}

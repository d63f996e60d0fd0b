//! Human-readable output.

use std::io::{self, Write};

use dispatch_core::engine::{DispatchEngine, SubmitError};
use dispatch_core::model::Order;
use dispatch_core::network::{LocationId, LocationKind, RoadNetwork, Route};
use dispatch_core::queues::QueueKind;
use dispatch_core::report::{DispatchRecord, DispatchReport, DropReason, PendingCounts, UndoOutcome};
use dispatch_io::SubmissionRow;

fn queue_label(queue: QueueKind) -> &'static str {
    match queue {
        QueueKind::Urgent => "urgent",
        QueueKind::Backlog => "backlog",
    }
}

fn kind_label(kind: LocationKind) -> &'static str {
    match kind {
        LocationKind::Restaurant => "restaurant",
        LocationKind::DeliveryPoint => "delivery point",
    }
}

pub fn path_text(path: &[LocationId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub fn network(out: &mut impl Write, network: &RoadNetwork) -> io::Result<()> {
    writeln!(
        out,
        "Locations ({}): {} restaurants, {} delivery points",
        network.len(),
        network.locations_of_kind(LocationKind::Restaurant).count(),
        network.locations_of_kind(LocationKind::DeliveryPoint).count()
    )?;
    for location in network.locations() {
        writeln!(
            out,
            "  [{}] {} ({})",
            location.id,
            location.name,
            kind_label(location.kind)
        )?;
    }
    writeln!(out, "Road segments ({}):", network.segments().len())?;
    for segment in network.segments() {
        writeln!(
            out,
            "  {} <-> {}  {} km  {}",
            network.location_name(segment.from),
            network.location_name(segment.to),
            segment.distance_km,
            segment.street
        )?;
    }
    Ok(())
}

pub fn route(
    out: &mut impl Write,
    network: &RoadNetwork,
    route: &Route,
    eta_minutes: Option<u64>,
) -> io::Result<()> {
    let from = network.location_name(route.source);
    let to = network.location_name(route.destination);
    let Some(distance) = route.distance_km() else {
        return writeln!(out, "No route from {from} to {to}");
    };

    writeln!(out, "{from} -> {to}: {distance} km")?;
    for leg in route.legs(network) {
        writeln!(
            out,
            "  {} -> {} via {} ({} km)",
            leg.from.name, leg.to.name, leg.street, leg.distance_km
        )?;
    }
    match eta_minutes {
        Some(eta) => writeln!(out, "ETA: {eta} min"),
        None => writeln!(out, "ETA: unknown"),
    }
}

pub fn rejected(out: &mut impl Write, row: &SubmissionRow, err: &SubmitError) -> io::Result<()> {
    writeln!(out, "Rejected order for {}: {err}", row.customer)
}

fn record(out: &mut impl Write, record: &DispatchRecord) -> io::Result<()> {
    writeln!(
        out,
        "Order #{} ({}) for {} from {}: courier {} ({} km away)",
        record.order_id,
        queue_label(record.queue),
        record.customer_name,
        record.restaurant_name,
        record.courier_name,
        record.courier_distance_km
    )?;
    match (record.distance_km, record.eta_minutes) {
        (Some(distance), Some(eta)) => writeln!(
            out,
            "  {distance} km, ETA {eta} min, path {}",
            path_text(&record.path)
        ),
        (Some(distance), None) => writeln!(
            out,
            "  {distance} km, path {}",
            path_text(&record.path)
        ),
        _ => writeln!(out, "  delivery point unreachable from restaurant"),
    }
}

pub fn cycle(out: &mut impl Write, number: usize, report: &DispatchReport) -> io::Result<()> {
    writeln!(out, "Cycle {number}:")?;
    if report.is_empty() {
        writeln!(out, "No orders dispatched.")?;
    }
    for dispatched in &report.dispatched {
        record(out, dispatched)?;
    }
    for dropped in &report.dropped {
        let reason = match dropped.reason {
            DropReason::UnknownCustomer(id) => format!("unknown customer {id}"),
            DropReason::UnknownRestaurant(id) => format!("unknown restaurant {id}"),
        };
        writeln!(out, "Dropped order #{}: {reason}", dropped.order_id)?;
    }
    if !report.demoted.is_empty() || !report.unmatched.is_empty() {
        writeln!(
            out,
            "Waiting for a courier: {} order(s)",
            report.demoted.len() + report.unmatched.len()
        )?;
    }
    Ok(())
}

pub fn undo(out: &mut impl Write, outcome: &UndoOutcome) -> io::Result<()> {
    match outcome {
        UndoOutcome::NothingToUndo => writeln!(out, "Nothing to undo."),
        UndoOutcome::Reverted {
            assignment,
            courier_name,
        } => writeln!(
            out,
            "Undid order #{}: courier {} is available again",
            assignment.order, courier_name
        ),
        UndoOutcome::CourierNotFound { assignment } => writeln!(
            out,
            "Undid order #{}: courier {} not found",
            assignment.order, assignment.courier
        ),
    }
}

pub fn pending(out: &mut impl Write, counts: PendingCounts) -> io::Result<()> {
    writeln!(
        out,
        "Pending: {} urgent, {} backlog",
        counts.urgent, counts.backlog
    )?;
    if counts.total() > 0 {
        writeln!(out, "Kept for the next run.")?;
    }
    Ok(())
}

pub fn restaurants(out: &mut impl Write, engine: &DispatchEngine) -> io::Result<()> {
    let listing = engine.restaurants().by_name();
    writeln!(out, "Restaurants ({}):", listing.len())?;
    for restaurant in listing {
        match engine.restaurant_location(restaurant.id) {
            Some(pickup) => writeln!(
                out,
                "  [{}] {}  pickup at {}",
                restaurant.id,
                restaurant.name,
                engine.network().location_name(pickup)
            )?,
            None => writeln!(
                out,
                "  [{}] {}  no pickup location",
                restaurant.id, restaurant.name
            )?,
        }
    }
    Ok(())
}

pub fn couriers(out: &mut impl Write, engine: &DispatchEngine) -> io::Result<()> {
    let couriers = engine.couriers();
    writeln!(
        out,
        "Couriers ({}, {} available):",
        couriers.len(),
        couriers.available_count()
    )?;
    for courier in couriers.iter() {
        writeln!(
            out,
            "  [{}] {} at {}  {}",
            courier.id,
            courier.name,
            engine.network().location_name(courier.location),
            if courier.available { "Available" } else { "Busy" }
        )?;
    }
    Ok(())
}

pub fn customers(out: &mut impl Write, engine: &DispatchEngine) -> io::Result<()> {
    writeln!(out, "Customers ({}):", engine.customers().len())?;
    for customer in engine.customers().iter() {
        writeln!(
            out,
            "  [{}] {} delivers to {}",
            customer.id,
            customer.name,
            engine.network().location_name(customer.delivery_location)
        )?;
    }
    Ok(())
}

fn order_line(engine: &DispatchEngine, order: &Order) -> String {
    let customer = engine
        .customers()
        .get(order.customer)
        .map_or_else(|| format!("customer {}", order.customer), |c| c.name.clone());
    let restaurant = engine
        .restaurants()
        .get(order.restaurant)
        .map_or_else(|| format!("restaurant {}", order.restaurant), |r| r.name.clone());
    format!(
        "#{} for {customer} from {restaurant}, priority {}",
        order.id, order.priority
    )
}

pub fn history(out: &mut impl Write, engine: &DispatchEngine) -> io::Result<()> {
    let history = engine.order_history();
    writeln!(out, "Order history ({}):", history.len())?;
    for order in history {
        let courier = order.courier.map(|id| {
            engine
                .couriers()
                .get(id)
                .map_or_else(|| format!("courier {id}"), |c| c.name.clone())
        });
        match courier {
            Some(courier) => writeln!(
                out,
                "  {}: {} to {courier}",
                order_line(engine, order),
                order.status
            )?,
            None => writeln!(out, "  {}: {}", order_line(engine, order), order.status)?,
        }
    }
    Ok(())
}

pub fn pending_orders(out: &mut impl Write, engine: &DispatchEngine) -> io::Result<()> {
    let counts = engine.pending_counts();
    writeln!(
        out,
        "Pending orders ({}; urgent at priority {} and above):",
        counts.total(),
        engine.config().urgent_threshold
    )?;
    for (queue, order) in engine.pending_orders() {
        writeln!(out, "  {:<8}{}", queue_label(queue), order_line(engine, order))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::test_helpers::sample_network;

    #[test]
    fn route_text_lists_streets_and_eta() {
        let network = sample_network();
        let route = network.shortest_path(LocationId(0), LocationId(3));
        let mut out = Vec::new();
        super::route(&mut out, &network, &route, Some(20)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Burns Road Food Street -> Gulshan-e-Iqbal: 10 km"));
        assert!(text.contains("via Rashid Minhas Road (4 km)"));
        assert!(text.ends_with("ETA: 20 min\n"));
    }

    #[test]
    fn unreachable_route_says_so() {
        let network = RoadNetwork::builder()
            .location("A", LocationKind::Restaurant)
            .location("B", LocationKind::DeliveryPoint)
            .build()
            .unwrap();
        let route = network.shortest_path(LocationId(0), LocationId(1));
        let mut out = Vec::new();
        super::route(&mut out, &network, &route, None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No route from A to B\n");
    }

    #[test]
    fn network_header_counts_location_kinds() {
        let mut out = Vec::new();
        super::network(&mut out, &sample_network()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Locations (10): 5 restaurants, 5 delivery points\n"));
    }

    #[test]
    fn pending_line_mentions_carry_over_only_when_needed() {
        let mut out = Vec::new();
        pending(&mut out, PendingCounts { urgent: 0, backlog: 0 }).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Pending: 0 urgent, 0 backlog\n");

        let mut out = Vec::new();
        pending(&mut out, PendingCounts { urgent: 1, backlog: 2 }).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Pending: 1 urgent, 2 backlog\nKept for the next run.\n"
        );
    }

    #[test]
    fn path_is_arrow_joined() {
        assert_eq!(
            path_text(&[LocationId(0), LocationId(4), LocationId(3)]),
            "0 -> 4 -> 3"
        );
    }
}

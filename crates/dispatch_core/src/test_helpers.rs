//! Test helpers: a shared sample network so every test reuses the same geography.
//!
//! The sample is a ten-location Karachi network: restaurants at locations
//! 0, 2, 4, 6 and 9; delivery points at 1, 3, 5, 7 and 8.

use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::engine::DispatchEngine;
use crate::model::{Courier, CourierId, Restaurant, RestaurantId};
use crate::network::{LocationId, LocationKind, RoadNetwork};
use crate::registry::{CourierRoster, RestaurantDirectory};

/// Delivery-point locations of the sample network.
pub const SAMPLE_DELIVERY_POINTS: [usize; 5] = [1, 3, 5, 7, 8];

/// Build the sample network.
///
/// # Panics
///
/// Panics if the fixture itself is malformed (should never happen).
pub fn sample_network() -> RoadNetwork {
    use LocationKind::{DeliveryPoint, Restaurant};

    RoadNetwork::builder()
        .location("Burns Road Food Street", Restaurant)
        .location("Clifton Block 2", DeliveryPoint)
        .location("Boat Basin Cafe", Restaurant)
        .location("Gulshan-e-Iqbal", DeliveryPoint)
        .location("Saddar Tikka House", Restaurant)
        .location("DHA Phase 5", DeliveryPoint)
        .location("Tariq Road Broast", Restaurant)
        .location("Bahria Town", DeliveryPoint)
        .location("North Nazimabad", DeliveryPoint)
        .location("Zamzama BBQ Tonight", Restaurant)
        .segment(0, 1, 8, "Shahrah-e-Faisal")
        .segment(0, 4, 6, "M.A. Jinnah Road")
        .segment(0, 2, 10, "Clifton Bridge")
        .segment(1, 5, 8, "Korangi Road")
        .segment(1, 2, 5, "Khayaban-e-Shamsheer")
        .segment(4, 6, 9, "Shahrah-e-Quaideen")
        .segment(2, 3, 7, "University Road")
        .segment(5, 6, 6, "Tariq Road")
        .segment(5, 4, 12, "Sunset Boulevard")
        .segment(3, 4, 4, "Rashid Minhas Road")
        .segment(3, 6, 6, "Jail Chowrangi")
        .segment(6, 7, 11, "Super Highway")
        .segment(7, 8, 5, "Abul Hasan Isphahani Road")
        .segment(8, 9, 7, "Nishtar Road")
        .build()
        .expect("sample network should be valid")
}

/// Restaurants 1-5, each recorded at its actual restaurant location.
pub fn sample_restaurants() -> RestaurantDirectory {
    [
        (1, "Burns Road Food Street", 0),
        (2, "Boat Basin Cafe", 2),
        (3, "Saddar Tikka House", 4),
        (4, "Tariq Road Broast", 6),
        (5, "Zamzama BBQ Tonight", 9),
    ]
    .into_iter()
    .map(|(id, name, location)| Restaurant {
        id: RestaurantId(id),
        name: name.to_string(),
        location: LocationId(location),
    })
    .collect()
}

/// Three couriers: Ahmed at 0, Bilal at 4, Sana at 6.
///
/// # Panics
///
/// Panics if the fixture registers a duplicate id (should never happen).
pub fn sample_couriers() -> CourierRoster {
    let mut roster = CourierRoster::new();
    for (id, name, location) in [(1, "Ahmed", 0), (2, "Bilal", 4), (3, "Sana", 6)] {
        roster
            .register(Courier::new(CourierId(id), name, LocationId(location)))
            .expect("sample courier ids are unique");
    }
    roster
}

/// Engine over the sample network, restaurants and couriers.
pub fn sample_engine(config: DispatchConfig) -> DispatchEngine {
    DispatchEngine::new(
        Arc::new(sample_network()),
        sample_restaurants(),
        sample_couriers(),
        config,
    )
}

//! Registries owning couriers, customers and restaurants, keyed by id.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::model::{Courier, CourierId, Customer, CustomerId, Restaurant, RestaurantId};
use crate::network::LocationId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("courier {0} is already registered")]
    DuplicateCourier(CourierId),

    #[error("customer {0} is already registered")]
    DuplicateCustomer(CustomerId),

    #[error("restaurant {0} is already registered")]
    DuplicateRestaurant(RestaurantId),

    #[error("no customer ids left")]
    CustomerIdsExhausted,
}

/// Couriers in registration order. Nearest-courier scans walk this order,
/// so earlier registrations win exact distance ties.
#[derive(Debug, Default, Clone)]
pub struct CourierRoster {
    couriers: Vec<Courier>,
    index: HashMap<CourierId, usize>,
}

impl CourierRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, courier: Courier) -> Result<(), RegistryError> {
        if self.index.contains_key(&courier.id) {
            return Err(RegistryError::DuplicateCourier(courier.id));
        }
        self.index.insert(courier.id, self.couriers.len());
        self.couriers.push(courier);
        Ok(())
    }

    pub fn get(&self, id: CourierId) -> Option<&Courier> {
        self.index.get(&id).map(|&i| &self.couriers[i])
    }

    pub fn get_mut(&mut self, id: CourierId) -> Option<&mut Courier> {
        self.index.get(&id).map(|&i| &mut self.couriers[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Courier> + '_ {
        self.couriers.iter()
    }

    pub fn available_count(&self) -> usize {
        self.couriers.iter().filter(|c| c.available).count()
    }

    pub fn len(&self) -> usize {
        self.couriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couriers.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CustomerBook {
    customers: BTreeMap<CustomerId, Customer>,
    /// `None` once `u32::MAX` has been handed out or reserved.
    next_id: Option<u32>,
}

impl Default for CustomerBook {
    fn default() -> Self {
        Self {
            customers: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl CustomerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next `register` call will use.
    pub fn next_id(&self) -> Option<CustomerId> {
        self.next_id.map(CustomerId)
    }

    /// Create a customer with a fresh id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        delivery_location: LocationId,
    ) -> Result<CustomerId, RegistryError> {
        let id = CustomerId(self.next_id.ok_or(RegistryError::CustomerIdsExhausted)?);
        self.next_id = id.0.checked_add(1);
        self.customers.insert(
            id,
            Customer {
                id,
                name: name.into(),
                delivery_location,
            },
        );
        Ok(id)
    }

    /// Insert a previously persisted customer, keeping fresh ids above it.
    pub fn insert(&mut self, customer: Customer) -> Result<(), RegistryError> {
        if self.customers.contains_key(&customer.id) {
            return Err(RegistryError::DuplicateCustomer(customer.id));
        }
        self.reserve_through(customer.id);
        self.customers.insert(customer.id, customer);
        Ok(())
    }

    /// Make sure ids up to and including `id` are never handed out again.
    pub fn reserve_through(&mut self, id: CustomerId) {
        self.next_id = match (self.next_id, id.0.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.customers.values()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Read-only restaurant reference data.
#[derive(Debug, Default, Clone)]
pub struct RestaurantDirectory {
    restaurants: BTreeMap<RestaurantId, Restaurant>,
}

impl RestaurantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, restaurant: Restaurant) -> Result<(), RegistryError> {
        if self.restaurants.contains_key(&restaurant.id) {
            return Err(RegistryError::DuplicateRestaurant(restaurant.id));
        }
        self.restaurants.insert(restaurant.id, restaurant);
        Ok(())
    }

    pub fn get(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurants.get(&id)
    }

    pub fn contains(&self, id: RestaurantId) -> bool {
        self.restaurants.contains_key(&id)
    }

    /// Ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> + '_ {
        self.restaurants.values()
    }

    /// Alphabetical listing; equal names keep id order.
    pub fn by_name(&self) -> Vec<&Restaurant> {
        let mut listing: Vec<&Restaurant> = self.restaurants.values().collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        listing
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

impl FromIterator<Restaurant> for RestaurantDirectory {
    /// Later duplicates are ignored.
    fn from_iter<I: IntoIterator<Item = Restaurant>>(iter: I) -> Self {
        let mut directory = Self::new();
        for restaurant in iter {
            directory.restaurants.entry(restaurant.id).or_insert(restaurant);
        }
        directory
    }
}

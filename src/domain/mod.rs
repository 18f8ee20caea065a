//! Storefront domain: value objects, aggregates and their events
pub mod aggregates;
pub mod events;
pub mod value_objects;

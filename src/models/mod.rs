//! Data models for the Sahayta application
//!
//! - Location: place queries, coordinates and lookup outcomes
//! - Weather: current conditions snapshot
//! - Scene: route map composition

pub mod location;
pub mod scene;
pub mod weather;

pub use location::{Coordinate, Lookup, PlaceQuery};
pub use scene::{CameraFraming, DeckDocument, RouteScene};
pub use weather::WeatherSnapshot;

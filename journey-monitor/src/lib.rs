//! SNCF journey monitor.
//!
//! Polls the Navitia journeys API for configured origin → destination
//! trips, derives delay information by comparing scheduled ("base") times
//! against real-time times, and republishes the result as observable
//! entities: a trip summary, per-train entities, and a calendar feed.

pub mod config;
pub mod domain;
pub mod engine;
pub mod navitia;
pub mod stations;
pub mod views;
pub mod web;

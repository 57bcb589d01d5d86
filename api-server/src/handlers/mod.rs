//! HTTP handlers

pub mod entities;
pub mod health;
pub mod plans;
pub mod signals;
pub mod strategies;

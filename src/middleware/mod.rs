// Middleware applied around the router

pub mod cors;

pub use cors::*;

// handlers/mod.rs - REST surface
//
// Each entity route builds a GraphQL operation (or takes the caller's
// `?query=` text on reads) and replies with the raw GraphQL envelope.
// Authentication and request-shape checks happen in extractors, so a handler
// body only runs for well-formed, authorised requests.

pub mod auth;
pub mod formats;
pub mod graphql;
pub mod movies;
pub mod users;

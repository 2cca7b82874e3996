//! Recipe resolution service: matches free-text queries against a small
//! corpus and falls back to an LLM generation endpoint.

pub mod corpus;
pub mod matcher;
pub mod resolver;
pub mod routes;
pub mod similarity;

//! Building blocks shared by the recipe services: configuration, the recipe
//! DTOs, the generation error taxonomy and the client for the generation
//! endpoint.

pub mod config;
pub mod dto;
pub mod error;
pub mod json_fence;
pub mod openai_client;

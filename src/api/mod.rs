/// HTTP API types
pub mod dto;

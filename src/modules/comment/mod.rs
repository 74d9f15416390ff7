pub mod dto;
pub mod handler;
pub mod memory;
pub mod model;

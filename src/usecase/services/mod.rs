pub mod extract_service;
pub mod filter;
pub mod grouping;

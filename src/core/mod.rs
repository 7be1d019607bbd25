pub mod config;
pub mod connections;
pub mod errors;
pub mod ports;
pub mod session;
pub mod surface;
pub mod types;

#[cfg(test)]
mod tests;

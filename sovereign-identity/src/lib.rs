pub mod api;
pub mod config;

#[cfg(test)]
mod tests;

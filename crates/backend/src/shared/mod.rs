pub mod config;
pub mod data;
pub mod edit_view;
pub mod metadata;

#[cfg(test)]
pub mod test_support;

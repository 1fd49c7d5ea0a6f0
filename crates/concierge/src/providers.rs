pub mod base;
pub mod configs;
pub mod dify;

#[cfg(test)]
pub mod mock;

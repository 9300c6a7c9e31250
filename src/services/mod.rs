pub mod cache;
pub mod classifier;
pub mod demo;
pub mod dispatch;
pub mod favorites;
pub mod feed;
pub mod filter;
pub mod random;
pub mod source;

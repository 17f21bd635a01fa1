pub mod docset;
pub mod index;
pub mod logging;
pub mod repair;
pub mod store;
pub mod tag;

pub mod mock;
pub mod multi_provider;
pub mod price_provider;
pub mod stooq;
pub mod twelvedata;

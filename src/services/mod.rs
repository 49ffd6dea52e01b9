pub mod forecast_service;
pub mod price_service;
pub mod seasonal_model;

mod forecast;
mod price_point;

pub use forecast::{CombinedPoint, ForecastPoint, ForecastRow, Segment, StockForecast};
pub use price_point::{PricePoint, PriceSeries};

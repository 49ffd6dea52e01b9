pub(crate) mod forecast;
pub(crate) mod health;
pub(crate) mod prices;

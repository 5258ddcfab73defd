mod config;
mod syndicate;
mod truncate;

pub mod station_api;

pub mod property_seed;

pub mod zeroc;

// Application layer - Subsystems that consume the settings table
pub mod clock_service;
pub mod polling_service;
pub mod status_source;
pub mod touch_service;

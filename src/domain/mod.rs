// Domain layer - Settings table and the calendar rules it carries
pub mod calendar;
pub mod dst;
pub mod error;
pub mod pins;
pub mod settings;

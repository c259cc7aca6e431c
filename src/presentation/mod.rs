// Presentation layer - What the display shows
pub mod screen;

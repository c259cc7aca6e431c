// Settings table and host-side subsystems of the FHEM status display
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Status screen - Text lines for the TFT header and status area
use crate::application::clock_service::ClockService;
use crate::application::polling_service::PollState;
use crate::domain::dst::LocalTime;
use crate::domain::pins::DisplayPins;

pub struct StatusScreen {
    clock: ClockService,
    pins: DisplayPins,
}

impl StatusScreen {
    pub fn new(clock: ClockService, pins: DisplayPins) -> Self {
        tracing::debug!(
            "Display on DC={} CS={} LED={}",
            pins.dc,
            pins.cs,
            pins.led
        );
        Self { clock, pins }
    }

    pub fn pins(&self) -> DisplayPins {
        self.pins
    }

    pub fn render(&self, local: &LocalTime, poll: Option<&PollState>) -> Vec<String> {
        vec![
            self.clock.date_line(local),
            self.clock.time_line(local),
            status_line(poll),
        ]
    }
}

fn status_line(poll: Option<&PollState>) -> String {
    let Some(poll) = poll else {
        return "FHEM: waiting".to_string();
    };
    match (&poll.last_status, &poll.last_error) {
        (_, Some(error)) => format!(
            "FHEM: offline ({}, {}x)",
            error, poll.consecutive_failures
        ),
        (Some(status), None) => format!(
            "FHEM: online ({} ms)",
            status.elapsed.as_millis()
        ),
        (None, None) => "FHEM: waiting".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::status_source::ServerStatus;
    use crate::domain::pins::BoardPin;
    use crate::domain::settings::Settings;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn screen() -> (StatusScreen, LocalTime) {
        let settings = Settings::default();
        let clock = ClockService::new(&settings).unwrap();
        let local = clock
            .now(Utc.with_ymd_and_hms(2024, 12, 24, 17, 0, 0).unwrap())
            .unwrap();
        (StatusScreen::new(clock, settings.display_pins()), local)
    }

    #[test]
    fn test_render_before_first_poll() {
        let (screen, local) = screen();
        assert_eq!(
            screen.render(&local, None),
            vec!["Di, 24. Dezember 2024", "18:00:00 CET", "FHEM: waiting"]
        );
    }

    #[test]
    fn test_render_online_and_offline() {
        let (screen, local) = screen();
        let online = PollState {
            last_status: Some(ServerStatus {
                http_status: 200,
                body_len: 10,
                elapsed: Duration::from_millis(35),
            }),
            last_error: None,
            consecutive_failures: 0,
            polls: 1,
        };
        assert_eq!(screen.render(&local, Some(&online))[2], "FHEM: online (35 ms)");

        let offline = PollState {
            last_error: Some("HTTP 401".to_string()),
            consecutive_failures: 3,
            ..online
        };
        assert_eq!(
            screen.render(&local, Some(&offline))[2],
            "FHEM: offline (HTTP 401, 3x)"
        );
    }

    #[test]
    fn test_display_pins_from_settings() {
        let (screen, _) = screen();
        assert_eq!(screen.pins().dc, BoardPin::D2);
        assert_eq!(screen.pins().cs, BoardPin::D1);
        assert_eq!(screen.pins().led, BoardPin::D8);
    }
}

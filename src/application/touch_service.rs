// Touch service - Debounced touch input gated by the touchpad feature flag
use crate::domain::pins::{BoardPin, TouchPins};
use crate::domain::settings::Settings;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

/// Hardware seam for the resistive touch controller
pub trait TouchPanel {
    /// Whether the interrupt line reports a press
    fn is_touched(&mut self, irq: BoardPin) -> bool;

    /// Read the raw coordinates over the controller's chip-select line
    fn read_point(&mut self, cs: BoardPin) -> Option<TouchPoint>;
}

pub struct TouchHandler<P> {
    panel: P,
    pins: Option<TouchPins>,
    debounce: Duration,
    last_accepted: Option<Instant>,
}

impl<P: TouchPanel> TouchHandler<P> {
    pub fn new(panel: P, settings: &Settings) -> Self {
        let pins = settings.touch_pins();
        if pins.is_none() {
            tracing::info!("Touchpad disabled, touch input will be ignored");
        }
        Self {
            panel,
            pins,
            debounce: settings.timing.touch_debounce(),
            last_accepted: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pins.is_some()
    }

    /// Returns a touch only if one is present and outside the debounce window
    pub fn poll(&mut self, now: Instant) -> Option<TouchPoint> {
        let pins = self.pins?;
        if !self.panel.is_touched(pins.irq) {
            return None;
        }

        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.debounce {
                tracing::trace!("Ignoring touch inside debounce window");
                return None;
            }
        }

        let point = self.panel.read_point(pins.cs)?;
        self.last_accepted = Some(now);
        tracing::debug!("Touch at ({}, {})", point.x, point.y);
        Some(point)
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct StubPanel {
        pressed: bool,
        irq_reads: Vec<BoardPin>,
        cs_reads: Vec<BoardPin>,
    }

    impl TouchPanel for StubPanel {
        fn is_touched(&mut self, irq: BoardPin) -> bool {
            self.irq_reads.push(irq);
            self.pressed
        }

        fn read_point(&mut self, cs: BoardPin) -> Option<TouchPoint> {
            self.cs_reads.push(cs);
            Some(TouchPoint { x: 120, y: 200 })
        }
    }

    fn pressed_panel() -> StubPanel {
        StubPanel {
            pressed: true,
            ..StubPanel::default()
        }
    }

    #[test]
    fn test_disabled_touchpad_never_reads_pins() {
        let mut settings = Settings::default();
        settings.features.touchpad = false;
        let mut handler = TouchHandler::new(pressed_panel(), &settings);

        assert!(!handler.is_enabled());
        assert_eq!(handler.poll(Instant::now()), None);
        assert!(handler.panel().irq_reads.is_empty());
        assert!(handler.panel().cs_reads.is_empty());
    }

    #[test]
    fn test_enabled_touchpad_uses_configured_pins() {
        let settings = Settings::default();
        let mut handler = TouchHandler::new(pressed_panel(), &settings);

        assert_eq!(
            handler.poll(Instant::now()),
            Some(TouchPoint { x: 120, y: 200 })
        );
        assert_eq!(handler.panel().irq_reads, vec![BoardPin::D4]);
        assert_eq!(handler.panel().cs_reads, vec![BoardPin::D3]);
    }

    #[test]
    fn test_second_touch_inside_window_is_ignored() {
        let settings = Settings::default();
        let mut handler = TouchHandler::new(pressed_panel(), &settings);
        let start = Instant::now();

        assert!(handler.poll(start).is_some());
        assert!(handler.poll(start + Duration::from_millis(300)).is_none());
        assert!(handler.poll(start + Duration::from_millis(999)).is_none());
        assert!(handler.poll(start + Duration::from_millis(1000)).is_some());
        assert_eq!(handler.panel().cs_reads.len(), 2);
    }

    #[test]
    fn test_zero_debounce_accepts_every_touch() {
        let mut settings = Settings::default();
        settings.timing.touch_debounce_ms = 0;
        let mut handler = TouchHandler::new(pressed_panel(), &settings);
        let now = Instant::now();

        assert!(handler.poll(now).is_some());
        assert!(handler.poll(now).is_some());
    }

    #[test]
    fn test_no_press_skips_coordinate_read() {
        let mut handler = TouchHandler::new(StubPanel::default(), &Settings::default());
        assert_eq!(handler.poll(Instant::now()), None);
        assert_eq!(handler.panel().irq_reads.len(), 1);
        assert!(handler.panel().cs_reads.is_empty());
    }
}

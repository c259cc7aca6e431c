// Board pin assignments for the TFT display and touch controller
use crate::domain::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// NodeMCU silkscreen labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoardPin {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
}

impl BoardPin {
    /// ESP8266 GPIO number behind the label
    pub fn gpio(self) -> u8 {
        match self {
            BoardPin::D0 => 16,
            BoardPin::D1 => 5,
            BoardPin::D2 => 4,
            BoardPin::D3 => 0,
            BoardPin::D4 => 2,
            BoardPin::D5 => 14,
            BoardPin::D6 => 12,
            BoardPin::D7 => 13,
            BoardPin::D8 => 15,
        }
    }
}

impl fmt::Display for BoardPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (GPIO{})", self, self.gpio())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    TftDc,
    TftCs,
    TftLed,
    TouchCs,
    TouchIrq,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinRole::TftDc => "TFT_DC",
            PinRole::TftCs => "TFT_CS",
            PinRole::TftLed => "TFT_LED",
            PinRole::TouchCs => "TOUCH_CS",
            PinRole::TouchIrq => "TOUCH_IRQ",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPins {
    pub dc: BoardPin,
    pub cs: BoardPin,
    pub led: BoardPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPins {
    pub cs: BoardPin,
    pub irq: BoardPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMap {
    pub tft_dc: BoardPin,
    pub tft_cs: BoardPin,
    pub tft_led: BoardPin,
    pub touch_cs: BoardPin,
    pub touch_irq: BoardPin,
}

impl PinMap {
    pub fn display_pins(&self) -> DisplayPins {
        DisplayPins {
            dc: self.tft_dc,
            cs: self.tft_cs,
            led: self.tft_led,
        }
    }

    /// Touch pins, only handed out when the touchpad is fitted
    pub fn touch_pins(&self, touchpad: bool) -> Option<TouchPins> {
        touchpad.then_some(TouchPins {
            cs: self.touch_cs,
            irq: self.touch_irq,
        })
    }

    /// Pins in use at the same time, in declaration order
    pub fn active(&self, touchpad: bool) -> Vec<(PinRole, BoardPin)> {
        let mut pins = vec![
            (PinRole::TftDc, self.tft_dc),
            (PinRole::TftCs, self.tft_cs),
            (PinRole::TftLed, self.tft_led),
        ];
        if touchpad {
            pins.push((PinRole::TouchCs, self.touch_cs));
            pins.push((PinRole::TouchIrq, self.touch_irq));
        }
        pins
    }

    pub fn check_conflicts(&self, touchpad: bool) -> Result<(), SettingsError> {
        let active = self.active(touchpad);
        for (i, (first, pin)) in active.iter().enumerate() {
            if let Some((second, _)) = active[i + 1..].iter().find(|(_, other)| other == pin) {
                return Err(SettingsError::PinConflict {
                    first: *first,
                    second: *second,
                    pin: *pin,
                });
            }
        }
        Ok(())
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            tft_dc: BoardPin::D2,
            tft_cs: BoardPin::D1,
            tft_led: BoardPin::D8,
            touch_cs: BoardPin::D3,
            touch_irq: BoardPin::D4,
        }
    }
}

//! Piezo buzzer on a PWM channel.
//!
//! - `beep` starts the tone and returns immediately
//! - `poll` silences it once the tone's time is up
//!
//! The main loop calls `poll` every tick so menu animations never wait on
//! a tone.

use embassy_nrf::pwm::{Instance, SimplePwm};
use embassy_time::{Duration, Instant};

use crate::render::{tone_duty, ToneDevice};

pub struct Buzzer<'d, T: Instance> {
    pwm: SimplePwm<'d, T>,
    stop_at: Option<Instant>,
}

impl<'d, T: Instance> Buzzer<'d, T> {
    /// Wrap a single-channel PWM and make sure it starts quiet.
    pub fn new(pwm: SimplePwm<'d, T>) -> Self {
        let mut buzzer = Self { pwm, stop_at: None };
        buzzer.silence();
        buzzer
    }

    pub fn is_sounding(&self) -> bool {
        self.stop_at.is_some()
    }

    /// Stop the current tone if its duration has elapsed.
    pub fn poll(&mut self) {
        if let Some(stop_at) = self.stop_at {
            if Instant::now() >= stop_at {
                self.silence();
            }
        }
    }

    fn silence(&mut self) {
        self.pwm.set_duty(0, 0);
        self.pwm.disable();
        self.stop_at = None;
    }
}

impl<'d, T: Instance> ToneDevice for Buzzer<'d, T> {
    fn beep(&mut self, duration_ms: u16, frequency_hz: u16, volume: u8) {
        if volume == 0 || frequency_hz == 0 || duration_ms == 0 {
            self.silence();
            return;
        }
        self.pwm.enable();
        self.pwm.set_period(u32::from(frequency_hz));
        let duty = tone_duty(self.pwm.max_duty(), volume);
        self.pwm.set_duty(0, duty);
        self.stop_at = Some(Instant::now() + Duration::from_millis(u64::from(duration_ms)));
        trace!("beep {} Hz for {} ms at volume {}", frequency_hz, duration_ms, volume);
    }
}

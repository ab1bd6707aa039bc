//! DC fan motor driver (H-bridge direction pair + PWM enable line).
//!
//! Wiring:
//! - `in1`/`in2`: direction inputs of the H-bridge, push-pull outputs.
//!   IN1=HIGH, IN2=LOW drives forward; both low is a free-running stop.
//! - `enable`: PWM channel gating motor power.
//! - `indicator`: PWM channel for the status LED; its duty always mirrors
//!   the enable duty so LED brightness tracks fan speed.
//!
//! Reverse is wired but never driven.

use anyhow::Result;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// Map a speed percentage to a duty magnitude against the channel maximum.
///
/// `percent` must already be clamped to 0..=100; the result truncates
/// toward zero, so `scale(0, m) == 0` and `scale(100, m) == m`.
pub fn scale(percent: u8, max_duty: u16) -> u16 {
    (percent as u32 * max_duty as u32 / 100) as u16
}

/// What the request loop needs from the motor.
pub trait Fan {
    fn off(&mut self) -> Result<()>;
    fn forward(&mut self) -> Result<()>;
    fn set_speed(&mut self, percent: u8) -> Result<()>;
}

pub struct FanMotor<IN1, IN2, EN, LED> {
    in1: IN1,
    in2: IN2,
    enable: EN,
    indicator: LED,
}

impl<IN1, IN2, EN, LED> FanMotor<IN1, IN2, EN, LED>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: SetDutyCycle,
    LED: SetDutyCycle,
    IN1::Error: std::error::Error + Send + Sync + 'static,
    IN2::Error: std::error::Error + Send + Sync + 'static,
    EN::Error: std::error::Error + Send + Sync + 'static,
    LED::Error: std::error::Error + Send + Sync + 'static,
{
    /// Takes ownership of the pins and parks the motor in the off state.
    pub fn new(in1: IN1, in2: IN2, enable: EN, indicator: LED) -> Result<Self> {
        let mut motor = Self {
            in1,
            in2,
            enable,
            indicator,
        };
        motor.off()?;
        Ok(motor)
    }
}

impl<IN1, IN2, EN, LED> Fan for FanMotor<IN1, IN2, EN, LED>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: SetDutyCycle,
    LED: SetDutyCycle,
    IN1::Error: std::error::Error + Send + Sync + 'static,
    IN2::Error: std::error::Error + Send + Sync + 'static,
    EN::Error: std::error::Error + Send + Sync + 'static,
    LED::Error: std::error::Error + Send + Sync + 'static,
{
    /// Free-running stop: both direction pins low, enable and indicator at 0.
    fn off(&mut self) -> Result<()> {
        self.in1.set_low()?;
        self.in2.set_low()?;
        self.enable.set_duty_cycle(0)?;
        self.indicator.set_duty_cycle(0)?;
        Ok(())
    }

    /// Select the forward direction. Leaves the duty untouched.
    fn forward(&mut self) -> Result<()> {
        self.in1.set_high()?;
        self.in2.set_low()?;
        Ok(())
    }

    /// Write `percent` of the enable channel's maximum duty to the enable
    /// and indicator channels.
    fn set_speed(&mut self, percent: u8) -> Result<()> {
        let duty = scale(percent.min(100), self.enable.max_duty_cycle());
        self.enable.set_duty_cycle(duty)?;
        self.indicator.set_duty_cycle(duty)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::pwm::{Mock as PwmMock, Transaction as PwmTransaction};

    const MAX: u16 = 8191;

    #[test]
    fn scale_endpoints() {
        assert_eq!(scale(0, MAX), 0);
        assert_eq!(scale(100, MAX), MAX);
        assert_eq!(scale(100, u16::MAX), u16::MAX);
    }

    #[test]
    fn scale_truncates() {
        // 30 * 8191 / 100 = 2457.3
        assert_eq!(scale(30, MAX), 2457);
    }

    #[test]
    fn scale_is_monotonic() {
        let mut last = 0;
        for p in 0..=100 {
            let duty = scale(p, MAX);
            assert!(duty >= last, "scale({p}) regressed");
            last = duty;
        }
    }

    fn off_expectations() -> (PinMock, PinMock, PwmMock, PwmMock) {
        (
            PinMock::new(&[PinTransaction::set(PinState::Low)]),
            PinMock::new(&[PinTransaction::set(PinState::Low)]),
            PwmMock::new(&[PwmTransaction::set_duty_cycle(0)]),
            PwmMock::new(&[PwmTransaction::set_duty_cycle(0)]),
        )
    }

    #[test]
    fn new_parks_motor_off() {
        let (in1, in2, en, led) = off_expectations();
        let motor = FanMotor::new(in1, in2, en, led).unwrap();

        let FanMotor {
            mut in1,
            mut in2,
            mut enable,
            mut indicator,
        } = motor;
        in1.done();
        in2.done();
        enable.done();
        indicator.done();
    }

    #[test]
    fn forward_sets_direction_only() {
        let (in1, in2, en, led) = off_expectations();
        let mut motor = FanMotor::new(in1, in2, en, led).unwrap();
        motor.in1.update_expectations(&[PinTransaction::set(PinState::High)]);
        motor.in2.update_expectations(&[PinTransaction::set(PinState::Low)]);
        motor.enable.update_expectations(&[]);
        motor.indicator.update_expectations(&[]);

        motor.forward().unwrap();

        motor.in1.done();
        motor.in2.done();
        motor.enable.done();
        motor.indicator.done();
    }

    #[test]
    fn set_speed_mirrors_duty_to_indicator() {
        let (in1, in2, en, led) = off_expectations();
        let mut motor = FanMotor::new(in1, in2, en, led).unwrap();
        let duty = scale(75, MAX);
        motor.in1.update_expectations(&[]);
        motor.in2.update_expectations(&[]);
        motor.enable.update_expectations(&[
            PwmTransaction::max_duty_cycle(MAX),
            PwmTransaction::set_duty_cycle(duty),
        ]);
        motor.indicator.update_expectations(&[PwmTransaction::set_duty_cycle(duty)]);

        motor.set_speed(75).unwrap();

        motor.in1.done();
        motor.in2.done();
        motor.enable.done();
        motor.indicator.done();
    }

    #[test]
    fn set_speed_clamps_oversized_percent() {
        let (in1, in2, en, led) = off_expectations();
        let mut motor = FanMotor::new(in1, in2, en, led).unwrap();
        motor.in1.update_expectations(&[]);
        motor.in2.update_expectations(&[]);
        motor.enable.update_expectations(&[
            PwmTransaction::max_duty_cycle(MAX),
            PwmTransaction::set_duty_cycle(MAX),
        ]);
        motor.indicator.update_expectations(&[PwmTransaction::set_duty_cycle(MAX)]);

        motor.set_speed(200).unwrap();

        motor.in1.done();
        motor.in2.done();
        motor.enable.done();
        motor.indicator.done();
    }
}

use std::net::TcpListener;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::hal::units::Hertz;

use fanix::motor::FanMotor;
use fanix::server::{self, FanState};
use fanix::wifi;

/// PWM carrier for the enable line and the status LED.
const PWM_FREQUENCY: Hertz = Hertz(1000);

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    // One LEDC timer feeds both duty channels
    let timer_config = TimerConfig::new()
        .frequency(PWM_FREQUENCY)
        .resolution(Resolution::Bits13);
    let timer = LedcTimerDriver::new(peripherals.ledc.timer0, &timer_config)?;

    let enable = LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio4)?;
    let indicator = LedcDriver::new(peripherals.ledc.channel1, &timer, peripherals.pins.gpio8)?;
    let in1 = PinDriver::output(peripherals.pins.gpio5)?;
    let in2 = PinDriver::output(peripherals.pins.gpio6)?;

    // Constructor parks the motor off; state starts off to match
    let mut motor = FanMotor::new(in1, in2, enable, indicator)?;
    let mut state = FanState::default();

    let _wifi = wifi::start_ap(peripherals.modem, sysloop)?;

    let listener = TcpListener::bind("0.0.0.0:80")?;
    log::info!("listening on {}", listener.local_addr()?);

    server::serve(&listener, &mut state, &mut motor)
}

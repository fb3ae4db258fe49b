#![no_std]
#![no_main]

mod clock;
mod print;

use cortex_m::asm;
use cortex_m_rt::entry;
use embedded_hal::blocking::delay::DelayMs;
use log::info;
#[cfg(not(debug_assertions))]
use panic_halt as _;
use presence_core::{config, mp3::Mp3Module, AdcSampler, PresenceMonitor};
use stm32f3xx_hal::{self as hal, adc, pac, prelude::*};

#[cfg(debug_assertions)]
use print::println;

// The converter runs at 12 bits; readings are scaled down to 10
const ADC_RESOLUTION_BITS: u8 = 12;
const MP3_BAUD: u32 = 9600;
const MP3_POWER_UP_MS: u16 = 1500;

#[entry]
fn main() -> ! {
    asm::delay(8_000 * 5); // Wait 5 ms for clock generator startup

    let cp = pac::CorePeripherals::take().unwrap();
    let mut dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(16.MHz())
        .bypass_hse()
        .sysclk(72.MHz())
        .hclk(72.MHz())
        .pclk1(36.MHz())
        .pclk2(72.MHz())
        .freeze(&mut flash.acr);

    let mut sys_clock = clock::SysClock::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    let tx = gpioa.pa2.into_af7_push_pull(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrl);
    let rx = gpioa.pa3.into_af7_push_pull(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrl);
    let serial = hal::serial::Serial::new(dp.USART2, (tx, rx), 115_200.Bd(), clocks, &mut rcc.apb1);
    let (tx, _) = serial.split();

    print::init(tx);

    // Sonar analog output on A0 (PA0)
    let sonar_pin = gpioa.pa0.into_analog(&mut gpioa.moder, &mut gpioa.pupdr);
    let adc1 = adc::Adc::adc1(dp.ADC1, &mut dp.ADC1_2, &mut rcc.ahb, adc::CkMode::default(), clocks);
    let sampler: AdcSampler<pac::ADC1, _, _> = AdcSampler::new(adc1, sonar_pin, ADC_RESOLUTION_BITS);

    let tx = gpioa.pa9.into_af7_push_pull(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrh);
    let rx = gpioa.pa10.into_af7_push_pull(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrh);
    let serial = hal::serial::Serial::new(dp.USART1, (tx, rx), MP3_BAUD.Bd(), clocks, &mut rcc.apb2);
    let (mp3_tx, _) = serial.split();

    sys_clock.delay_ms(MP3_POWER_UP_MS);
    let player = Mp3Module::new(mp3_tx);

    info!(
        "Sonar on A{}, present below {} ({} in)",
        config::SONAR_CHANNEL,
        config::DISTANCE_THRESHOLD,
        config::DISTANCE_THRESHOLD_IN
    );
    let mut monitor = PresenceMonitor::new(sampler, &sys_clock, player);

    loop {
        monitor.poll();
        sys_clock.wait();
    }
}

#[cfg(debug_assertions)]
#[panic_handler]
pub fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("{}", info);
    loop {}
}

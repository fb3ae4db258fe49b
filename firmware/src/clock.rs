use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::{
    asm,
    peripheral::{syst::SystClkSource, SYST},
};
use cortex_m_rt::exception;
use embedded_hal::blocking::delay::DelayMs;
use presence_core::Clock;
use stm32f3xx_hal::rcc::Clocks;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Millisecond counter driven by SysTick.
#[derive(Debug)]
pub struct SysClock(());

impl SysClock {
    pub fn new(mut syst: SYST, clocks: Clocks) -> Self {
        syst.set_clock_source(SystClkSource::External); // HCLK / 8
        syst.set_reload(clocks.hclk().0 / 8 / 1000 - 1); // 1 kHz
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();
        Self(())
    }

    /// Sleeps until the next tick.
    #[inline]
    pub fn wait(&self) {
        asm::wfi();
    }
}

impl Clock for SysClock {
    fn now_millis(&self) -> u32 {
        MILLIS.load(Ordering::Relaxed)
    }
}

impl DelayMs<u16> for SysClock {
    fn delay_ms(&mut self, ms: u16) {
        let start = self.now_millis();
        while self.now_millis().wrapping_sub(start) < ms as u32 {
            self.wait();
        }
    }
}

#[exception]
fn SysTick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

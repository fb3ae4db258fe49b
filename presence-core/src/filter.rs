use crate::hal::RawSampler;

/// ADC history of one analog sensor, averaged on every read.
///
/// Until the buffer has been written `N` times only the samples written so
/// far are averaged, so early results are not dragged toward zero.
#[derive(Clone, Debug)]
pub struct SampleHistory<const N: usize> {
    val: [u16; N],
    // Next slot to overwrite
    idx: usize,
    // Writes so far, saturating at N
    filled: usize,
}

impl<const N: usize> SampleHistory<N> {
    const NON_EMPTY: () = assert!(N > 0, "history needs at least one slot");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self { val: [0; N], idx: 0, filled: 0 }
    }

    /// Forgets every sample.
    pub fn init(&mut self) {
        self.val = [0; N];
        self.idx = 0;
        self.filled = 0;
    }

    /// Acquires one sample and returns the filtered value.
    ///
    /// A failed acquisition leaves the history untouched.
    pub fn read<S: RawSampler>(&mut self, sampler: &mut S) -> Result<u16, S::Error> {
        let raw = sampler.sample()?;
        Ok(self.push(raw))
    }

    /// Records `raw` and returns the mean of the valid samples.
    pub fn push(&mut self, raw: u16) -> u16 {
        self.val[self.idx] = raw;
        if self.filled < N {
            self.filled += 1;
        }

        // Before the first wrap the valid samples are exactly the first
        // `filled` slots; afterwards they are all of them, rotated.
        let sum: u32 = self.val[..self.filled].iter().map(|&v| u32::from(v)).sum();
        let avg = (sum / self.filled as u32) as u16;

        self.idx = (self.idx + 1) % N;
        avg
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn write_index(&self) -> usize {
        self.idx
    }

    /// True once every slot holds a real sample.
    pub fn is_warm(&self) -> bool {
        self.filled == N
    }
}

impl<const N: usize> Default for SampleHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

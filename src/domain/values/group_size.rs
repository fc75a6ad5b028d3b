/// Target group size `k`, always at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSize(usize);

impl GroupSize {
    pub fn new(value: i64) -> Result<Self, String> {
        if value < 2 {
            return Err(format!("Group size must be at least 2, got {value}"));
        }
        usize::try_from(value)
            .map(GroupSize)
            .map_err(|_| format!("Group size out of range: {value}"))
    }

    pub fn value(&self) -> usize {
        self.0
    }

    /// ⌈k/2⌉
    pub fn half_ceil(&self) -> usize {
        self.0.div_ceil(2)
    }

    /// Smallest group a remainder may form on its own: max(2, ⌈k/2⌉).
    pub fn min_remainder(&self) -> usize {
        self.half_ceil().max(2)
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        GroupSize(4)
    }
}

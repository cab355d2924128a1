/// Counts loop iterations, to pace heartbeats.
///
/// A heartbeat is due every [`interval`][Self::interval] ticks, starting
/// from the `interval`th tick. Tick 0 (before the first
/// [`advance()`][Self::advance]) is never due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatTick {
    count: u64,
    interval: u64,
}

impl HeartbeatTick {
    /// Makes a new counter; an `interval` of 0 is treated as 1.
    pub fn new(interval: u64) -> Self {
        Self {
            count: 0,
            interval: interval.max(1),
        }
    }

    /// Counts a loop iteration, returning the new count.
    pub fn advance(&mut self) -> u64 {
        self.count = self.count.wrapping_add(1);
        self.count
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// `true` if a heartbeat should be sent on this tick.
    pub fn is_due(&self) -> bool {
        self.count != 0 && self.count % self.interval == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_tenth() {
        let mut tick = HeartbeatTick::new(10);
        assert!(!tick.is_due());

        let mut due = Vec::new();
        for _ in 0..105 {
            let count = tick.advance();
            if tick.is_due() {
                due.push(count);
            }
        }
        assert_eq!(vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100], due);
        assert_eq!(105, tick.count());
    }

    #[test]
    fn zero_interval() {
        let mut tick = HeartbeatTick::new(0);
        assert_eq!(1, tick.interval());
        tick.advance();
        assert!(tick.is_due());
    }
}

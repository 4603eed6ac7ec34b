/// Number of 100 ns ticks per second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Timestamp consisting of a seconds and a microseconds component
///
/// This is the driver clock reading attached to every dequeued buffer.
pub struct Timestamp {
    pub sec: i64,
    pub usec: i64,
}

impl Timestamp {
    /// Returns a timestamp representation
    ///
    /// # Arguments
    ///
    /// * `sec` - Seconds
    /// * `usec` - Microseconds
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::Timestamp;
    /// let ts = Timestamp::new(5, 5);
    /// ```
    pub const fn new(sec: i64, usec: i64) -> Self {
        Timestamp { sec, usec }
    }

    /// Fixed-point representation in 100 ns units
    ///
    /// # Example
    ///
    /// ```
    /// use omt_capture::Timestamp;
    /// assert_eq!(Timestamp::new(2, 500_000).ticks(), 25_000_000);
    /// ```
    pub const fn ticks(&self) -> i64 {
        self.sec * TICKS_PER_SECOND + self.usec * 10
    }
}

impl From<libc::timeval> for Timestamp {
    fn from(tv: libc::timeval) -> Self {
        Timestamp {
            sec: tv.tv_sec as i64,
            usec: tv.tv_usec as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks() {
        assert_eq!(Timestamp::new(2, 500_000).ticks(), 25_000_000);
        assert_eq!(Timestamp::new(0, 1).ticks(), 10);
        assert_eq!(Timestamp::default().ticks(), 0);
    }

    #[test]
    fn from_timeval() {
        let tv = libc::timeval {
            tv_sec: 12,
            tv_usec: 345,
        };
        assert_eq!(Timestamp::from(tv), Timestamp::new(12, 345));
    }
}

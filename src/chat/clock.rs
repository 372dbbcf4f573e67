use chrono::Utc;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::Clock;

    /// Test clock; clones share the same time.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct ManualClock(Rc<Cell<i64>>);

    impl ManualClock {
        pub(crate) fn at(millis: i64) -> Self {
            Self(Rc::new(Cell::new(millis)))
        }

        pub(crate) fn set(&self, millis: i64) {
            self.0.set(millis);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.get()
        }
    }
}

// Film rating
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Collection of clock implementations.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    /// Converts a timestamp to nanoseconds since the epoch, panicking if it does not fit.
    fn to_nanos(ts: OffsetDateTime) -> i64 {
        i64::try_from(ts.unix_timestamp_nanos()).expect("Timestamp out of test range")
    }

    /// Converts a duration to nanoseconds, panicking if it does not fit.
    fn duration_nanos(d: Duration) -> i64 {
        i64::try_from(d.as_nanos()).expect("Duration out of test range")
    }

    /// A clock that returns a preconfigured instant and that can be modified at will.
    pub struct SettableClock {
        /// Current fake time in nanoseconds.
        now_ns: AtomicI64,
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured with `set`.
        pub fn new(now: OffsetDateTime) -> Self {
            Self { now_ns: AtomicI64::new(to_nanos(now)) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            self.now_ns.store(to_nanos(now), Ordering::SeqCst);
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            self.now_ns.fetch_add(duration_nanos(delta), Ordering::SeqCst);
        }
    }

    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_ns = self.now_ns.load(Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(now_ns)).unwrap()
        }
    }

    /// A clock that moves forward by a fixed step every time it is queried.
    ///
    /// Useful to obtain distinct but predictable timestamps for consecutive operations.
    pub struct MonotonicClock {
        /// Time to return on the next query, in nanoseconds.
        next_ns: AtomicI64,

        /// Amount of nanoseconds to advance after every query.
        step_ns: i64,
    }

    impl MonotonicClock {
        /// Creates a new clock that starts at `start` and advances by `step` on every query.
        pub fn new(start: OffsetDateTime, step: Duration) -> Self {
            Self { next_ns: AtomicI64::new(to_nanos(start)), step_ns: duration_nanos(step) }
        }
    }

    impl Clock for MonotonicClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_ns = self.next_ns.fetch_add(self.step_ns, Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(now_ns)).unwrap()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use time::macros::datetime;

        #[test]
        fn test_settableclock_nanosecond_precision() {
            let now = datetime!(2023-12-01 10:15:00.123456789 UTC);
            let clock = SettableClock::new(now);
            assert_eq!(now, clock.now_utc());
            assert_eq!(now, clock.now_utc());

            let now = datetime!(2023-12-01 10:15:00.987654321 UTC);
            clock.set(now);
            assert_eq!(now, clock.now_utc());

            clock.advance(Duration::from_nanos(1));
            assert_eq!(datetime!(2023-12-01 10:15:00.987654322 UTC), clock.now_utc());
        }

        #[test]
        fn test_monotonicclock_advances_on_every_query() {
            let clock = MonotonicClock::new(
                datetime!(2023-12-01 10:40:00 UTC),
                Duration::from_secs(60),
            );
            assert_eq!(datetime!(2023-12-01 10:40:00 UTC), clock.now_utc());
            assert_eq!(datetime!(2023-12-01 10:41:00 UTC), clock.now_utc());
            assert_eq!(datetime!(2023-12-01 10:42:00 UTC), clock.now_utc());
        }
    }
}

//! Timing context carried from the first builder call to the result.

use std::time::{Duration, Instant};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Measures one statement: started with the builder, marked when rendered.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
    built: Option<Instant>,
}

impl Stopwatch {
    /// Starts a new stopwatch.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            built: None,
        }
    }

    /// Marks the end of the build phase.
    #[must_use]
    pub fn mark_built(mut self) -> Self {
        self.built = Some(Instant::now());
        self
    }

    /// Time spent building, or the elapsed time when not yet marked.
    #[must_use]
    pub fn build_time(&self) -> Duration {
        self.built
            .map_or_else(|| self.started.elapsed(), |b| b.duration_since(self.started))
    }

    /// Time since the stopwatch started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Closes the measurement with the time spent talking to the database.
    #[must_use]
    pub fn finish(&self, request: Duration) -> Timings {
        Timings {
            build: self.build_time(),
            request,
            total: self.elapsed(),
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

/// Execution timings of one statement.
///
/// Serialized as fractional seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timings {
    /// Builder calls until rendering finished.
    pub build: Duration,
    /// Round trip to the database.
    pub request: Duration,
    /// Everything.
    pub total: Duration,
}

impl Serialize for Timings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Timings", 3)?;
        state.serialize_field("build", &self.build.as_secs_f64())?;
        state.serialize_field("request", &self.request.as_secs_f64())?;
        state.serialize_field("total", &self.total.as_secs_f64())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_covers_build_and_request() {
        let watch = Stopwatch::start().mark_built();
        let timings = watch.finish(Duration::ZERO);
        assert!(timings.total >= timings.build);
    }

    #[test]
    fn serializes_seconds() {
        let timings = Timings {
            build: Duration::from_millis(500),
            request: Duration::from_secs(1),
            total: Duration::from_millis(1500),
        };
        assert_eq!(
            serde_json::to_string(&timings).unwrap(),
            r#"{"build":0.5,"request":1.0,"total":1.5}"#
        );
    }
}

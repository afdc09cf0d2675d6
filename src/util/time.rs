use std::{fmt::Display, time::Instant};

use crate::logvbln;

/// Logs how long a scope took once it is dropped.
pub struct Benchmark {
    time: Instant,
    label: String,
}

impl Benchmark {
    const CC: &'static str = "Benchmark";

    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            time: Instant::now(),
        }
    }

    #[cfg(test)]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for Benchmark {
    fn drop(&mut self) {
        logvbln!("{}: {}", self.label, self);
    }
}

impl Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.time.elapsed();

        if duration.as_secs() > 60 {
            write!(
                f,
                "{:0>2}:{:0>2}min",
                duration.as_secs() / 60,
                duration.as_secs() % 60
            )
        } else {
            write!(f, "{}ms", duration.as_millis())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_render_in_millis() {
        let benchmark = Benchmark::start("candidate 42");

        assert_eq!(benchmark.label(), "candidate 42");
        assert!(benchmark.to_string().ends_with("ms"));
    }
}

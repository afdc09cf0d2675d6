use chrono::{DateTime, Utc};

/// Anything that can be placed on the shared timeline both platforms are matched on.
pub trait Timestamped {
    fn start_instant(&self) -> DateTime<Utc>;
}

impl<T: Timestamped> Timestamped for &T {
    fn start_instant(&self) -> DateTime<Utc> {
        (*self).start_instant()
    }
}

use crate::{
    errors::{SyncError, SyncResult},
    processors::feeds::{SinkActivityFeed, SourceActivityFeed},
};

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Required {
    Source,
    Sink,
}

pub struct Facilities<'a> {
    source: Option<&'a dyn SourceActivityFeed>,
    sink: Option<&'a dyn SinkActivityFeed>,
}

impl<'a> Facilities<'a> {
    pub fn source(&self) -> SyncResult<&'a dyn SourceActivityFeed> {
        self.source
            .ok_or_else(|| SyncError::Configuration("Expecting source activity feed".to_string()))
    }

    pub fn sink(&self) -> SyncResult<&'a dyn SinkActivityFeed> {
        self.sink
            .ok_or_else(|| SyncError::Configuration("Expecting sink activity feed".to_string()))
    }

    pub fn check(&self, required: &[Required]) -> SyncResult<()> {
        for depend in required {
            match depend {
                Required::Source => {
                    self.source()?;
                }
                Required::Sink => {
                    self.sink()?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct DependenciesBuilder<'a> {
    source: Option<&'a dyn SourceActivityFeed>,
    sink: Option<&'a dyn SinkActivityFeed>,
}

impl<'a> DependenciesBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: &'a dyn SourceActivityFeed) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn SinkActivityFeed) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Facilities<'a> {
        Facilities {
            source: self.source,
            sink: self.sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_feed_fails_the_check() {
        let facilities = DependenciesBuilder::new().build();

        assert!(facilities.check(&[]).is_ok());
        assert!(matches!(
            facilities.check(&[Required::Source, Required::Sink]),
            Err(SyncError::Configuration(_))
        ));
    }
}

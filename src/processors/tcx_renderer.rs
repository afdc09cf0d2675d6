use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::{
    data_types::workout::{Lap, Tcx, Trackpoint},
    errors::{SyncError, SyncResult},
    util::DateTimeUtils,
};

const TCX_HEADER: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<TrainingCenterDatabase
  xsi:schemaLocation="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd"
  xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2"
  xmlns:ns2="http://www.garmin.com/xmlschemas/UserProfile/v2"
  xmlns:ns3="http://www.garmin.com/xmlschemas/ActivityExtension/v2"
  xmlns:ns4="http://www.garmin.com/xmlschemas/ProfileExtension/v1"
  xmlns:ns5="http://www.garmin.com/xmlschemas/ActivityGoals/v1"
  xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#;

/// Aggregates Garmin expects on every lap, derived from the lap's trackpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct LapSummary {
    pub distance_meters: f64,
    /// Kept in the unit the source reported.
    pub maximum_speed: f64,
    pub maximum_heart_rate: f64,
    pub maximum_watts: f64,
    pub maximum_cadence: i32,
    pub average_cadence: f64,
    pub average_heart_rate: f64,
    pub average_watts: f64,
    /// Meters per second.
    pub average_speed: f64,
}

impl LapSummary {
    pub fn from_lap(index: usize, lap: &Lap) -> SyncResult<LapSummary> {
        let trackpoints = &lap.trackpoints;
        if trackpoints.len() < 2 {
            return Err(SyncError::InsufficientData {
                lap: index,
                trackpoints: trackpoints.len(),
            });
        }

        let mut maximum_speed = 0.0_f64;
        let mut maximum_heart_rate = 0.0_f64;
        let mut maximum_watts = 0.0_f64;
        let mut maximum_cadence = 0;

        let mut cadence_sum = 0.0;
        let mut heart_rate_sum = 0.0;
        let mut watts_sum = 0.0;

        for tp in trackpoints {
            maximum_speed = maximum_speed.max(tp.speed.0);
            maximum_heart_rate = maximum_heart_rate.max(tp.heart_rate as f64);
            maximum_watts = maximum_watts.max(tp.power);
            maximum_cadence = maximum_cadence.max(tp.cadence);

            // Samples are treated as evenly spaced.
            cadence_sum += tp.cadence as f64;
            heart_rate_sum += tp.heart_rate as f64;
            watts_sum += tp.power;
        }

        // Measured from the second point so a synthesized start point never counts.
        let distance_meters = trackpoints[trackpoints.len() - 1].distance.to_meters()
            - trackpoints[1].distance.to_meters();

        let count = trackpoints.len() as f64;

        Ok(LapSummary {
            distance_meters,
            maximum_speed,
            maximum_heart_rate,
            maximum_watts,
            maximum_cadence,
            average_cadence: cadence_sum / count,
            average_heart_rate: heart_rate_sum / count,
            average_watts: watts_sum / count,
            average_speed: distance_meters / lap.total_seconds as f64,
        })
    }
}

pub struct TcxRenderer;

impl TcxRenderer {
    /// Serializes the laps into a single-activity Biking document.
    pub fn render(laps: &[Lap], start: DateTime<Utc>, notes: &str) -> SyncResult<Tcx> {
        let mut out = String::from(TCX_HEADER);

        out.push_str("  <Activities>\n");
        out.push_str("    <Activity Sport=\"Biking\">\n");
        push_line(
            &mut out,
            6,
            &format!("<Id>{}</Id>", DateTimeUtils::to_tcx_instant(&start)),
        );

        for (index, lap) in laps.iter().enumerate() {
            let summary = LapSummary::from_lap(index, lap)?;
            TcxRenderer::render_lap(&mut out, lap, &summary);
        }

        push_line(
            &mut out,
            6,
            &format!("<Notes>{}</Notes>", html_escape::encode_text(notes)),
        );
        out.push_str("    </Activity>\n");
        out.push_str("  </Activities>\n");
        out.push_str("</TrainingCenterDatabase>\n");

        Ok(Tcx {
            start,
            content: out,
        })
    }

    fn render_lap(out: &mut String, lap: &Lap, summary: &LapSummary) {
        let _ = writeln!(
            out,
            "      <Lap StartTime=\"{}\">",
            DateTimeUtils::to_tcx_instant(&lap.start)
        );

        let fields = [
            format!("<TotalTimeSeconds>{}</TotalTimeSeconds>", lap.total_seconds),
            format!("<DistanceMeters>{}</DistanceMeters>", summary.distance_meters),
            format!("<MaximumSpeed>{}</MaximumSpeed>", summary.maximum_speed),
            format!("<Calories>{}</Calories>", lap.calories),
            "<AverageHeartRateBpm>".to_string(),
            format!("  <Value>{}</Value>", summary.average_heart_rate as i32),
            "</AverageHeartRateBpm>".to_string(),
            "<MaximumHeartRateBpm>".to_string(),
            format!("  <Value>{}</Value>", summary.maximum_heart_rate as i32),
            "</MaximumHeartRateBpm>".to_string(),
            "<Intensity>Active</Intensity>".to_string(),
            format!("<Cadence>{}</Cadence>", summary.average_cadence),
            "<TriggerMethod>Manual</TriggerMethod>".to_string(),
        ];
        for field in &fields {
            push_line(out, 8, field);
        }

        push_line(out, 8, "<Track>");
        for trackpoint in &lap.trackpoints {
            TcxRenderer::render_trackpoint(out, trackpoint);
        }
        push_line(out, 8, "</Track>");

        let extensions = [
            "<Extensions>".to_string(),
            "  <ns3:LX>".to_string(),
            format!("    <ns3:AvgSpeed>{}</ns3:AvgSpeed>", summary.average_speed),
            format!(
                "    <ns3:MaxBikeCadence>{}</ns3:MaxBikeCadence>",
                summary.maximum_cadence
            ),
            format!("    <ns3:AvgWatts>{}</ns3:AvgWatts>", summary.average_watts),
            format!("    <ns3:MaxWatts>{}</ns3:MaxWatts>", summary.maximum_watts),
            "  </ns3:LX>".to_string(),
            "</Extensions>".to_string(),
        ];
        for line in &extensions {
            push_line(out, 8, line);
        }

        out.push_str("      </Lap>\n");
    }

    fn render_trackpoint(out: &mut String, trackpoint: &Trackpoint) {
        let lines = [
            "<Trackpoint>".to_string(),
            format!(
                "  <Time>{}</Time>",
                DateTimeUtils::to_tcx_instant(&trackpoint.time)
            ),
            format!(
                "  <DistanceMeters>{}</DistanceMeters>",
                trackpoint.distance.to_meters()
            ),
            "  <HeartRateBpm>".to_string(),
            format!("    <Value>{}</Value>", trackpoint.heart_rate),
            "  </HeartRateBpm>".to_string(),
            format!("  <Cadence>{}</Cadence>", trackpoint.cadence),
            "  <Extensions>".to_string(),
            "    <ns3:TPX>".to_string(),
            format!(
                "      <ns3:Speed>{}</ns3:Speed>",
                trackpoint.speed.to_meters_per_second()
            ),
            format!("      <ns3:Watts>{}</ns3:Watts>", trackpoint.power as i32),
            "    </ns3:TPX>".to_string(),
            "  </Extensions>".to_string(),
            "</Trackpoint>".to_string(),
        ];
        for line in &lines {
            push_line(out, 10, line);
        }
    }
}

fn push_line(out: &mut String, indent: usize, line: &str) {
    let _ = writeln!(out, "{:indent$}{}", "", line, indent = indent);
}

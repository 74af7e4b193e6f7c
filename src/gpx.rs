use crate::error::ExportError;
use crate::types::{Workout, WorkoutType};
use crate::view::MarkerRenderer;
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";

#[derive(Debug, Clone)]
struct Waypoint {
    id: String,
    lat: f64,
    lon: f64,
    time: DateTime<Utc>,
    name: String,
    kind: WorkoutType,
}

/// Map markers collected as GPX 1.1 waypoints, one per workout, with the
/// popup text as the waypoint name.
#[derive(Debug, Default, Clone)]
pub struct GpxMarkers {
    waypoints: Vec<Waypoint>,
    focused: bool,
}

impl GpxMarkers {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Puts the marker for `id` first and bounds the document on it, so a
    /// map opening the file starts centered on that workout. Returns `false`
    /// when no marker has that id.
    pub fn focus(&mut self, id: &str) -> bool {
        let Some(idx) = self.waypoints.iter().position(|w| w.id == id) else {
            return false;
        };
        let wpt = self.waypoints.remove(idx);
        self.waypoints.insert(0, wpt);
        self.focused = true;
        true
    }

    pub fn to_gpx(&self) -> Result<String, ExportError> {
        let mut xml = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        emit(
            &mut xml,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        emit(
            &mut xml,
            Event::Start(BytesStart::new("gpx").with_attributes([
                ("version", "1.1"),
                ("creator", "mapty"),
                ("xmlns", GPX_NS),
            ])),
        )?;

        if self.focused
            && let Some(first) = self.waypoints.first()
        {
            let lat = first.lat.to_string();
            let lon = first.lon.to_string();
            emit(&mut xml, Event::Start(BytesStart::new("metadata")))?;
            emit(
                &mut xml,
                Event::Empty(BytesStart::new("bounds").with_attributes([
                    ("minlat", lat.as_str()),
                    ("minlon", lon.as_str()),
                    ("maxlat", lat.as_str()),
                    ("maxlon", lon.as_str()),
                ])),
            )?;
            emit(&mut xml, Event::End(BytesEnd::new("metadata")))?;
        }

        for wpt in &self.waypoints {
            let lat = wpt.lat.to_string();
            let lon = wpt.lon.to_string();
            let mut start = BytesStart::new("wpt");
            start.push_attribute(("lat", lat.as_str()));
            start.push_attribute(("lon", lon.as_str()));
            emit(&mut xml, Event::Start(start))?;

            text_element(&mut xml, "time", &wpt.time.to_rfc3339())?;
            text_element(&mut xml, "name", &wpt.name)?;
            text_element(&mut xml, "type", wpt.kind.as_str())?;

            emit(&mut xml, Event::End(BytesEnd::new("wpt")))?;
        }

        emit(&mut xml, Event::End(BytesEnd::new("gpx")))?;

        let bytes = xml.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| ExportError::Gpx(e.to_string()))
    }
}

impl MarkerRenderer for GpxMarkers {
    fn place_marker(&mut self, workout: &Workout) {
        let coords = workout.coords();
        self.waypoints.push(Waypoint {
            id: workout.id().to_string(),
            lat: coords.lat(),
            lon: coords.lng(),
            time: workout.created_at().with_timezone(&Utc),
            name: workout.popup_content(),
            kind: workout.kind(),
        });
    }
}

fn text_element(
    xml: &mut Writer<Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> Result<(), ExportError> {
    emit(xml, Event::Start(BytesStart::new(tag)))?;
    emit(xml, Event::Text(BytesText::new(text)))?;
    emit(xml, Event::End(BytesEnd::new(tag)))
}

fn emit(xml: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), ExportError> {
    xml.write_event(event)
        .map_err(|e| ExportError::Gpx(e.to_string()))
}

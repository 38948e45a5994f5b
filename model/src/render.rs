use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use catalogue::{Catalogue, GeoPoint, LineId};

use crate::palette::{marker_color, route_color};
use crate::{ActiveLines, Color, Omission, SelectionState, Settings, Vehicle};

/// Everything needed to draw one moment of the map
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub polylines: Vec<RoutePolyline>,
    pub markers: Vec<VehicleMarker>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoutePolyline {
    pub line: LineId,
    pub points: Vec<GeoPoint>,
    pub color: Color,
    pub opacity: f64,
    pub width: f64,
}

/// Tapping a marker shows details about its vehicle
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleMarker {
    pub vehicle: Vehicle,
    pub color: Color,
}

impl VehicleMarker {
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.vehicle.lat, self.vehicle.lng)
    }
}

/// Turns the current state into drawables. Deterministic; the same input always produces the
/// same frame.
pub fn project(
    active: &ActiveLines,
    catalogue: &Catalogue,
    vehicles: &[Vehicle],
    selection: &SelectionState,
    settings: &Settings,
) -> Frame {
    let mut polylines = Vec::new();
    for line in active.iter() {
        let route = match catalogue.get(line) {
            Some(route) => route,
            None => {
                debug!("No polyline: {}", Omission::UnknownLine(line.clone()));
                continue;
            }
        };
        if route.is_empty() {
            continue;
        }

        let selected = matches!(selection, SelectionState::Selected(x) if x == line);
        polylines.push(RoutePolyline {
            line: line.clone(),
            points: route.points().to_vec(),
            color: route_color(line),
            opacity: if selected {
                1.0
            } else {
                settings.dimmed_opacity
            },
            width: if selected {
                settings.selected_stroke_width
            } else {
                settings.stroke_width
            },
        });
    }

    let markers = vehicles
        .iter()
        .map(|vehicle| VehicleMarker {
            vehicle: vehicle.clone(),
            color: marker_color(&vehicle.line),
        })
        .collect();

    Frame { polylines, markers }
}

impl Frame {
    pub fn polyline(&self, line: &LineId) -> Option<&RoutePolyline> {
        self.polylines.iter().find(|pl| &pl.line == line)
    }

    /// Routes as LineStrings and vehicles as Points, styled with simplestyle properties
    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::new();

        for pl in &self.polylines {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(
                    pl.points
                        .iter()
                        .map(|pt| vec![pt.longitude, pt.latitude])
                        .collect(),
                ))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "route");
            feature.set_property("line", pl.line.as_str());
            feature.set_property("stroke", pl.color.to_hex());
            feature.set_property("stroke-opacity", pl.opacity);
            feature.set_property("stroke-width", pl.width);
            features.push(feature);
        }

        for marker in &self.markers {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    marker.vehicle.lng,
                    marker.vehicle.lat,
                ]))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "vehicle");
            feature.set_property("vehicle", marker.vehicle.id.as_str());
            feature.set_property("line", marker.vehicle.line.as_str());
            feature.set_property("marker-color", marker.color.to_hex());
            features.push(feature);
        }

        GeoJson::FeatureCollection(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }
}

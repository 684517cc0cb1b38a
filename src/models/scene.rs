//! Route scene composition
//!
//! A [`RouteScene`] is the declarative description of one map render: a start
//! marker, an optional destination marker joined by a single straight
//! connector, and a camera. There is no path-finding here; the connector is a
//! direct geometric line between the two points.

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use super::Coordinate;

pub const START_COLOR: Rgb = Rgb(46, 204, 113);
pub const END_COLOR: Rgb = Rgb(231, 76, 60);
pub const CONNECTOR_COLOR: Rgb = Rgb(52, 152, 219);

pub const MARKER_RADIUS_METERS: u32 = 350;
pub const CONNECTOR_WIDTH_SCALE: u32 = 2;
pub const CONNECTOR_WIDTH_MIN_PIXELS: u32 = 3;

pub const CAMERA_ZOOM: f64 = 10.0;
pub const CAMERA_PITCH: f64 = 45.0;
const MIN_FIT_ZOOM: f64 = 1.0;
const EARTH_CIRCUMFERENCE_KM: f64 = 40_075.0;

pub const MAP_STYLE: &str = "light";
pub const TOOLTIP_TEXT: &str = "Location";

/// RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// How the camera frames the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraFraming {
    /// Center on the start point with the fixed zoom. The destination may be
    /// off screen for long routes.
    #[default]
    Start,
    /// Center between both endpoints and zoom out to the route's span
    FitRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub role: MarkerRole,
    pub position: Coordinate,
    pub color: Rgb,
    pub radius_meters: u32,
}

impl Marker {
    fn new(role: MarkerRole, position: Coordinate) -> Self {
        let color = match role {
            MarkerRole::Start => START_COLOR,
            MarkerRole::End => END_COLOR,
        };
        Self {
            role,
            position,
            color,
            radius_meters: MARKER_RADIUS_METERS,
        }
    }
}

/// Straight line between the two route endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub from: Coordinate,
    pub to: Coordinate,
    pub color: Rgb,
    pub width_scale: u32,
    pub width_min_pixels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: f64,
    pub pitch: f64,
}

/// Markers, connector and camera for one render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteScene {
    markers: Vec<Marker>,
    connectors: Vec<Connector>,
    camera: Camera,
}

impl RouteScene {
    /// Compose a scene framed on the start point
    #[must_use]
    pub fn compose(start: Coordinate, end: Option<Coordinate>) -> Self {
        Self::compose_with(start, end, CameraFraming::Start)
    }

    #[must_use]
    pub fn compose_with(start: Coordinate, end: Option<Coordinate>, framing: CameraFraming) -> Self {
        let mut markers = vec![Marker::new(MarkerRole::Start, start)];
        let mut connectors = Vec::new();

        if let Some(end) = end {
            connectors.push(Connector {
                from: start,
                to: end,
                color: CONNECTOR_COLOR,
                width_scale: CONNECTOR_WIDTH_SCALE,
                width_min_pixels: CONNECTOR_WIDTH_MIN_PIXELS,
            });
            markers.push(Marker::new(MarkerRole::End, end));
        }

        let camera = match (framing, end) {
            (CameraFraming::FitRoute, Some(end)) => fit_camera(start, end),
            _ => Camera {
                center: start,
                zoom: CAMERA_ZOOM,
                pitch: CAMERA_PITCH,
            },
        };

        Self {
            markers,
            connectors,
            camera,
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Typed layer document for a deck-style map widget
    ///
    /// Layer order is start marker, connector, destination marker.
    #[must_use]
    pub fn to_deck(&self) -> DeckDocument {
        let scatter = |marker: &Marker| Layer::Scatterplot {
            data: vec![ScatterPoint {
                position: marker.position.lon_lat(),
                color: marker.color,
                radius: marker.radius_meters,
            }],
            pickable: true,
        };

        let mut layers = Vec::with_capacity(3);
        let (starts, ends): (Vec<&Marker>, Vec<&Marker>) = self
            .markers
            .iter()
            .partition(|marker| marker.role == MarkerRole::Start);

        layers.extend(starts.into_iter().map(scatter));
        layers.extend(self.connectors.iter().map(|connector| Layer::Line {
            data: vec![LineSegment {
                source_position: connector.from.lon_lat(),
                target_position: connector.to.lon_lat(),
            }],
            color: connector.color,
            width_scale: connector.width_scale,
            width_min_pixels: connector.width_min_pixels,
        }));
        layers.extend(ends.into_iter().map(scatter));

        DeckDocument {
            layers,
            initial_view_state: ViewState {
                latitude: self.camera.center.latitude(),
                longitude: self.camera.center.longitude(),
                zoom: self.camera.zoom,
                pitch: self.camera.pitch,
            },
            map_style: MAP_STYLE,
            tooltip: Tooltip { text: TOOLTIP_TEXT },
        }
    }
}

fn fit_camera(start: Coordinate, end: Coordinate) -> Camera {
    let span_km = distance(
        HaversineLocation {
            latitude: start.latitude(),
            longitude: start.longitude(),
        },
        HaversineLocation {
            latitude: end.latitude(),
            longitude: end.longitude(),
        },
        Units::Kilometers,
    );
    // One zoom level halves the visible width; keep a level of margin.
    let zoom = ((EARTH_CIRCUMFERENCE_KM / span_km).log2() - 1.0).clamp(MIN_FIT_ZOOM, CAMERA_ZOOM);

    // Averages are within range whenever both endpoints are.
    let center = Coordinate::new(
        (start.latitude() + end.latitude()) / 2.0,
        midpoint_longitude(start.longitude(), end.longitude()),
    )
    .unwrap_or(start);

    Camera {
        center,
        zoom,
        pitch: CAMERA_PITCH,
    }
}

/// Midpoint along the shorter arc, so routes across the antimeridian
/// centre near ±180 rather than at 0.
fn midpoint_longitude(from: f64, to: f64) -> f64 {
    let to = if to - from > 180.0 {
        to - 360.0
    } else if from - to > 180.0 {
        to + 360.0
    } else {
        to
    };
    let mid = (from + to) / 2.0;
    if mid > 180.0 {
        mid - 360.0
    } else if mid < -180.0 {
        mid + 360.0
    } else {
        mid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckDocument {
    pub layers: Vec<Layer>,
    pub initial_view_state: ViewState,
    pub map_style: &'static str,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "ScatterplotLayer")]
    Scatterplot {
        data: Vec<ScatterPoint>,
        pickable: bool,
    },
    #[serde(rename = "LineLayer")]
    Line {
        data: Vec<LineSegment>,
        color: Rgb,
        width_scale: u32,
        width_min_pixels: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub position: [f64; 2],
    pub color: Rgb,
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub source_position: [f64; 2],
    pub target_position: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mumbai() -> Coordinate {
        Coordinate::new(19.0760, 72.8777).unwrap()
    }

    fn pune() -> Coordinate {
        Coordinate::new(18.5204, 73.8567).unwrap()
    }

    #[test]
    fn test_route_scene_two_points() {
        let scene = RouteScene::compose(mumbai(), Some(pune()));

        assert_eq!(scene.markers().len(), 2);
        assert_eq!(scene.connectors().len(), 1);

        let connector = &scene.connectors()[0];
        assert_eq!(connector.from.latitude(), 19.0760);
        assert_eq!(connector.from.longitude(), 72.8777);
        assert_eq!(connector.to.latitude(), 18.5204);
        assert_eq!(connector.to.longitude(), 73.8567);
        assert_eq!(connector.color, CONNECTOR_COLOR);

        assert_eq!(scene.markers()[0].role, MarkerRole::Start);
        assert_eq!(scene.markers()[0].color, START_COLOR);
        assert_eq!(scene.markers()[1].role, MarkerRole::End);
        assert_eq!(scene.markers()[1].color, END_COLOR);
        assert_ne!(START_COLOR, END_COLOR);
    }

    #[test]
    fn test_route_scene_start_only() {
        let scene = RouteScene::compose(mumbai(), None);

        assert_eq!(scene.markers().len(), 1);
        assert!(scene.connectors().is_empty());
        assert_eq!(scene.markers()[0].position, mumbai());
    }

    #[test]
    fn test_camera_centers_on_start() {
        let scene = RouteScene::compose(mumbai(), Some(pune()));
        let camera = scene.camera();
        assert_eq!(camera.center, mumbai());
        assert_eq!(camera.zoom, CAMERA_ZOOM);
        assert_eq!(camera.pitch, CAMERA_PITCH);
    }

    #[test]
    fn test_fit_route_camera() {
        let scene = RouteScene::compose_with(mumbai(), Some(pune()), CameraFraming::FitRoute);
        let camera = scene.camera();

        assert!((camera.center.latitude() - 18.7982).abs() < 1e-9);
        assert!((camera.center.longitude() - 73.3672).abs() < 1e-9);
        assert!(camera.zoom < CAMERA_ZOOM);
        assert!(camera.zoom >= MIN_FIT_ZOOM);
        // Connector geometry is unaffected by framing
        assert_eq!(scene.connectors()[0].from, mumbai());
        assert_eq!(scene.connectors()[0].to, pune());
    }

    #[test]
    fn test_fit_route_across_antimeridian() {
        let suva = Coordinate::new(-17.0, 179.0).unwrap();
        let across = Coordinate::new(-17.0, -179.0).unwrap();

        let camera = RouteScene::compose_with(suva, Some(across), CameraFraming::FitRoute).camera().clone();
        assert!(camera.center.longitude().abs() > 170.0);
        assert!((camera.center.longitude().abs() - 180.0).abs() < 1e-9);
        assert_eq!(camera.center.latitude(), -17.0);

        let reversed = RouteScene::compose_with(across, Some(suva), CameraFraming::FitRoute).camera().clone();
        assert!((reversed.center.longitude().abs() - 180.0).abs() < 1e-9);
    }

    #[rstest::rstest]
    #[case(170.0, -170.0, 180.0)]
    #[case(-170.0, 170.0, -180.0)]
    #[case(175.0, -165.0, -175.0)]
    #[case(72.0, 74.0, 73.0)]
    #[case(-10.0, 10.0, 0.0)]
    fn test_midpoint_longitude(#[case] from: f64, #[case] to: f64, #[case] expected: f64) {
        assert!((midpoint_longitude(from, to) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fit_route_without_destination_falls_back_to_start() {
        let scene = RouteScene::compose_with(mumbai(), None, CameraFraming::FitRoute);
        assert_eq!(scene.camera().center, mumbai());
        assert_eq!(scene.camera().zoom, CAMERA_ZOOM);
    }

    #[test]
    fn test_fit_route_same_point_keeps_default_zoom() {
        let scene = RouteScene::compose_with(mumbai(), Some(mumbai()), CameraFraming::FitRoute);
        assert_eq!(scene.camera().zoom, CAMERA_ZOOM);
    }

    #[test]
    fn test_deck_document_layers() {
        let deck = RouteScene::compose(mumbai(), Some(pune())).to_deck();
        let value = serde_json::to_value(&deck).unwrap();

        let layers = value["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0]["type"], "ScatterplotLayer");
        assert_eq!(layers[1]["type"], "LineLayer");
        assert_eq!(layers[2]["type"], "ScatterplotLayer");

        assert_eq!(layers[0]["data"][0]["position"], json!([72.8777, 19.0760]));
        assert_eq!(layers[0]["data"][0]["color"], json!([46, 204, 113]));
        assert_eq!(layers[0]["data"][0]["radius"], 350);
        assert_eq!(layers[1]["data"][0]["source_position"], json!([72.8777, 19.0760]));
        assert_eq!(layers[1]["data"][0]["target_position"], json!([73.8567, 18.5204]));
        assert_eq!(layers[1]["color"], json!([52, 152, 219]));
        assert_eq!(layers[1]["width_min_pixels"], 3);
        assert_eq!(layers[2]["data"][0]["color"], json!([231, 76, 60]));

        assert_eq!(value["initial_view_state"]["zoom"], 10.0);
        assert_eq!(value["initial_view_state"]["pitch"], 45.0);
        assert_eq!(value["map_style"], "light");
        assert_eq!(value["tooltip"]["text"], "Location");
    }

    #[test]
    fn test_deck_document_single_marker() {
        let deck = RouteScene::compose(mumbai(), None).to_deck();
        assert_eq!(deck.layers.len(), 1);
        assert!(matches!(deck.layers[0], Layer::Scatterplot { .. }));
    }
}

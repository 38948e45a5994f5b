#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod lines;
mod routes;
mod shapes;

use std::collections::BTreeMap;

use anyhow::Result;

pub use ids::LineId;
pub use lines::LineInfo;
pub use routes::{GeoPoint, Route};

const BUNDLED_ROUTES: &str = include_str!("../data/routes.json");
const BUNDLED_LINES: &str = include_str!("../data/lines.csv");

/// Every known route, keyed by line. Loaded once and read-only afterwards.
#[derive(Clone, Default)]
pub struct Catalogue {
    routes: BTreeMap<LineId, Route>,
    lines: BTreeMap<LineId, LineInfo>,
}

impl Catalogue {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_routes(routes: Vec<Route>) -> Self {
        let mut catalogue = Self::empty();
        for route in routes {
            catalogue.routes.insert(route.line.clone(), route);
        }
        catalogue
    }

    /// The routes and line names compiled into the binary
    pub fn bundled() -> Result<Self> {
        let mut catalogue = Self::load_json(BUNDLED_ROUTES.as_bytes())?;
        catalogue.load_lines_csv(BUNDLED_LINES.as_bytes())?;
        Ok(catalogue)
    }

    pub fn load_json<R: std::io::Read>(reader: R) -> Result<Self> {
        let routes = routes::load_json(reader)?;
        info!("Loaded {} routes", routes.len());
        Ok(Self {
            routes,
            lines: BTreeMap::new(),
        })
    }

    pub fn load_shapes_csv<R: std::io::Read>(reader: R) -> Result<Self> {
        let routes = shapes::load(reader)?;
        info!("Loaded {} routes from shapes", routes.len());
        Ok(Self {
            routes,
            lines: BTreeMap::new(),
        })
    }

    /// Attaches line names. Names for lines without a route are kept; they just never draw
    /// anything.
    pub fn load_lines_csv<R: std::io::Read>(&mut self, reader: R) -> Result<()> {
        self.lines = lines::load(reader)?;
        for id in self.lines.keys() {
            if !self.routes.contains_key(id) {
                warn!("Line {id} has a name, but no route");
            }
        }
        Ok(())
    }

    /// None for unknown lines. Callers treat that as the line contributing nothing.
    pub fn get(&self, line: &LineId) -> Option<&Route> {
        self.routes.get(line)
    }

    pub fn line_info(&self, line: &LineId) -> Option<&LineInfo> {
        self.lines.get(line)
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineId> {
        self.routes.keys()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_data() {
        let catalogue = Catalogue::bundled().unwrap();
        assert_eq!(catalogue.len(), 6);
        assert_eq!(catalogue.get(&"20".into()).unwrap().len(), 8);
        assert!(catalogue.get(&"99".into()).is_none());
        assert_eq!(
            catalogue.line_info(&"17".into()).unwrap().name,
            "Aveiro ↔ Ovar"
        );
    }

    #[test]
    fn json_skips_malformed_lines() {
        let input = r#"{
            "1": [{"latitude": 1.0, "longitude": 2.0}, {"latitude": 1.5, "longitude": 2.5}],
            "2": "not a route",
            "3": [{"lat": 1.0}],
            "4": []
        }"#;
        let catalogue = Catalogue::load_json(input.as_bytes()).unwrap();
        assert_eq!(
            catalogue.lines().map(|l| l.as_str()).collect::<Vec<_>>(),
            vec!["1", "4"]
        );
        assert_eq!(
            catalogue.get(&"1".into()).unwrap().point(1),
            Some(GeoPoint::new(1.5, 2.5))
        );
        assert!(catalogue.get(&"4".into()).unwrap().is_empty());
    }

    #[test]
    fn json_must_be_a_mapping() {
        assert!(Catalogue::load_json("[1, 2, 3]".as_bytes()).is_err());
    }

    #[test]
    fn shapes_sorted_by_sequence() {
        let input = "line_id,sequence,latitude,longitude\n\
                     A,2,10.0,20.0\n\
                     A,0,11.0,21.0\n\
                     B,5,0.0,0.0\n\
                     A,1,12.0,22.0\n";
        let catalogue = Catalogue::load_shapes_csv(input.as_bytes()).unwrap();
        let route = catalogue.get(&"A".into()).unwrap();
        assert_eq!(
            route.points(),
            &[
                GeoPoint::new(11.0, 21.0),
                GeoPoint::new(12.0, 22.0),
                GeoPoint::new(10.0, 20.0)
            ]
        );
        assert!(!catalogue.get(&"B".into()).unwrap().can_host_vehicles());
    }

    #[test]
    fn shapes_reject_duplicate_sequence() {
        let input = "line_id,sequence,latitude,longitude\n\
                     A,0,10.0,20.0\n\
                     A,0,11.0,21.0\n";
        assert!(Catalogue::load_shapes_csv(input.as_bytes()).is_err());
    }

    #[test]
    fn lines_reject_duplicates() {
        let mut catalogue = Catalogue::empty();
        let input = "line_id,name\n15,One\n15,Two\n";
        assert!(catalogue.load_lines_csv(input.as_bytes()).is_err());
    }
}

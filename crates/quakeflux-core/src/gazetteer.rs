/// A coarse latitude/longitude rectangle. Both intervals are closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub country: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    const fn new(country: &'static str, lat: (f64, f64), lon: (f64, f64)) -> Self {
        Self {
            country,
            lat_min: lat.0,
            lat_max: lat.1,
            lon_min: lon.0,
            lon_max: lon.1,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.lat_min <= latitude
            && latitude <= self.lat_max
            && self.lon_min <= longitude
            && longitude <= self.lon_max
    }
}

/// Boxes overlap; the first one containing the point wins, so order matters.
pub static BOUNDING_BOXES: [BoundingBox; 16] = [
    BoundingBox::new("Nepal", (26.0, 31.0), (80.0, 89.0)),
    BoundingBox::new("India", (6.0, 36.0), (68.0, 97.5)),
    BoundingBox::new("China", (18.0, 53.6), (73.5, 134.8)),
    BoundingBox::new("Pakistan", (23.5, 37.1), (60.9, 77.5)),
    BoundingBox::new("Bangladesh", (20.5, 26.7), (88.0, 92.7)),
    BoundingBox::new("Bhutan", (26.4, 28.3), (88.7, 92.1)),
    BoundingBox::new("Sri Lanka", (5.9, 9.9), (79.7, 81.9)),
    BoundingBox::new("Myanmar", (9.4, 28.6), (92.2, 101.2)),
    BoundingBox::new("Japan", (24.0, 46.0), (128.0, 146.0)),
    BoundingBox::new("Indonesia", (-11.0, 6.2), (95.0, 141.0)),
    BoundingBox::new("Philippines", (4.5, 21.2), (116.9, 126.6)),
    BoundingBox::new("Turkey", (35.8, 42.1), (25.7, 45.0)),
    BoundingBox::new("Iran", (24.0, 40.4), (44.0, 63.3)),
    BoundingBox::new("Chile", (-56.0, -17.5), (-76.0, -66.0)),
    BoundingBox::new("Mexico", (14.5, 32.7), (-118.6, -86.6)),
    BoundingBox::new("United States", (24.5, 49.5), (-125.0, -66.9)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryKeyword {
    /// Lower-case substring searched for in the lower-cased place text.
    pub keyword: &'static str,
    pub country: &'static str,
}

const fn keyword(keyword: &'static str, country: &'static str) -> CountryKeyword {
    CountryKeyword { keyword, country }
}

/// Checked in order; the first keyword found wins.
pub static COUNTRY_KEYWORDS: [CountryKeyword; 16] = [
    keyword("nepal", "Nepal"),
    keyword("india", "India"),
    keyword("china", "China"),
    keyword("pakistan", "Pakistan"),
    keyword("bangladesh", "Bangladesh"),
    keyword("bhutan", "Bhutan"),
    keyword("sri lanka", "Sri Lanka"),
    keyword("myanmar", "Myanmar"),
    keyword("japan", "Japan"),
    keyword("indonesia", "Indonesia"),
    keyword("philippines", "Philippines"),
    keyword("turkey", "Turkey"),
    keyword("iran", "Iran"),
    keyword("chile", "Chile"),
    keyword("mexico", "Mexico"),
    keyword("united states", "United States"),
];

pub fn country_by_box(latitude: f64, longitude: f64) -> Option<&'static str> {
    BOUNDING_BOXES
        .iter()
        .find(|bbox| bbox.contains(latitude, longitude))
        .map(|bbox| bbox.country)
}

pub fn country_by_keyword(place: &str) -> Option<&'static str> {
    let lowered = place.to_lowercase();
    COUNTRY_KEYWORDS
        .iter()
        .find(|entry| lowered.contains(entry.keyword))
        .map(|entry| entry.country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_are_well_formed() {
        for bbox in &BOUNDING_BOXES {
            assert!(bbox.lat_min < bbox.lat_max, "{}", bbox.country);
            assert!(bbox.lon_min < bbox.lon_max, "{}", bbox.country);
        }
    }

    #[test]
    fn keywords_are_lower_case() {
        for entry in &COUNTRY_KEYWORDS {
            assert_eq!(entry.keyword, entry.keyword.to_lowercase());
        }
    }

    #[test]
    fn box_edges_are_inclusive() {
        assert_eq!(country_by_box(26.0, 80.0), Some("Nepal"));
        assert_eq!(country_by_box(31.0, 89.0), Some("Nepal"));
        assert_eq!(country_by_box(-56.0, -76.0), Some("Chile"));
    }
}

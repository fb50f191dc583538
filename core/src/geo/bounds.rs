/// Axis-aligned extent of a set of positions, in GeoJSON `bbox` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Smallest box covering every `(longitude, latitude)` pair, `None` when empty.
    pub fn covering<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = positions.into_iter();
        let (lon, lat) = iter.next()?;
        let start = Self {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        };
        Some(iter.fold(start, |bb, (lon, lat)| Self {
            min_lon: bb.min_lon.min(lon),
            min_lat: bb.min_lat.min(lat),
            max_lon: bb.max_lon.max(lon),
            max_lat: bb.max_lat.max(lat),
        }))
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

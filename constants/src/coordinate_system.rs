/// Local-flat earth model used for all metre/degree conversions.
/// Valid at survey scale (a few km); longitude degrees shrink with the
/// cosine of the latitude.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Metres spanned by one degree of longitude at the given latitude.
pub fn meters_per_degree_longitude(latitude: f64) -> f64 {
    METERS_PER_DEGREE_LATITUDE * latitude.to_radians().cos()
}

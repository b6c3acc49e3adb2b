#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Coordinate::new(0.0, 0.0), true)]
    #[case(Coordinate::new(90.0, 180.0), true)]
    #[case(Coordinate::new(-90.0, -180.0), true)]
    #[case(Coordinate::new(90.1, 0.0), false)]
    #[case(Coordinate::new(0.0, -180.5), false)]
    #[case(Coordinate::new(f64::NAN, 0.0), false)]
    fn is_valid(#[case] coordinate: Coordinate, #[case] expected: bool) {
        assert_eq!(coordinate.is_valid(), expected);
    }
}
